pub mod dto;
pub mod normalize;
