// Question handling: the parser that converts the generator's raw text blob into an
// ordered question list. The parser is the single validation point for that text;
// everything downstream operates on the structured sequence it emits.

pub mod parser;

pub use parser::parse_question_blocks;
