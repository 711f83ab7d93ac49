pub mod commands;
pub mod hit;
pub mod input;
pub mod tools;

pub use commands::{Command, CommandStack};
pub use hit::{grip_at, hit_test, hit_test_rect};
pub use input::{InputEvent, Modifiers};
pub use tools::{FrameTool, SelectTool, ShapeTool, TextTool, Tool, ToolKind, reflow};
