mod codec;
mod parser;
mod parser_util;
mod sentence_parser;

pub use codec::Codec;
pub use codec::CodecError;
pub use codec::MAX_LINE_LENGTH;

pub use parser::is_nmea;
pub use parser::parse_sentence;
pub use parser::GGAData;
pub use parser::GSAData;
pub use parser::RMCData;
pub use parser::SelectionMode;
pub use parser::Sentence;
pub use parser::SentenceError;
pub use parser::Talker;
pub use parser::ZDAData;

pub use parser_util::Date;
pub use parser_util::EastWest;
pub use parser_util::LatLon;
pub use parser_util::NorthSouth;
pub use parser_util::Time;

pub use sentence_parser::ChecksumMismatch;


#[cfg(test)]
mod test_codec;

#[cfg(test)]
mod test_parser_util;
