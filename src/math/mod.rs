mod matrix;
mod quaternion;
mod vector;

pub use matrix::*;
pub use quaternion::*;
pub use vector::*;
