pub mod normalize;
pub mod replay;
pub mod sanitize;
pub mod scan;
