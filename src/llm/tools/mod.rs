pub mod arithmetic;
pub mod calculator_tool;
pub mod search_tool;
mod tool;
pub mod weather_tool;

pub use calculator_tool::{calculate, CalculationError, CalculatorTool};
pub use search_tool::{search_web, SearchWebTool};
pub use tool::{FunctionDescriptor, LlmTool, ToolDescriptor};
pub use weather_tool::{get_current_weather, CurrentWeatherTool};
