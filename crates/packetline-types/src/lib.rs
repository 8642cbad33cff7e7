pub mod document;
pub mod normalized;
pub mod packet;
pub mod packet_type;
pub mod tool;

pub use document::*;
pub use normalized::*;
pub use packet::*;
pub use packet_type::*;
pub use tool::*;
