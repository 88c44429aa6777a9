// src/drivers/mod.rs
// 声明同级目录下的子模块文件
pub mod axis;
pub mod buffer;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod plot;
pub mod render;
pub mod serial;
pub mod source;
pub mod state;
// 公开导出 main / engine / gui 用到的类型
pub use buffer::Capacity;
pub use error::TelemetryError;
pub use pipeline::TelemetryPipeline;
pub use plot::write_snapshot;
pub use render::ChartBoard;
pub use serial::SerialSession;
pub use source::{LineReader, LineSource, SimulatedSource};
pub use state::SampleStateMachine;
