mod animation;
mod camera;
pub mod chicken;
mod light;
mod scene;

pub use animation::*;
pub use camera::*;
pub use chicken::{Joint, JointAngles, PART_COUNT};
pub use light::*;
pub use scene::*;
