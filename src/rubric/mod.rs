pub mod decode;
pub mod lookup;
pub mod parser;
pub mod report;
pub mod rtf;

pub use decode::{RubricSource, load_source};
pub use lookup::{group_items, resolve_guidance};
pub use parser::RubricParser;
pub use report::{format_report, score_totals, validate_scores};
pub use rtf::RtfDecoder;
