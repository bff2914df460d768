pub mod api;
pub mod boot;
pub mod config;
pub mod dom;
pub mod fragment;
pub mod frame;
pub mod nav;
pub mod panel;
pub mod poll;
pub mod render;
pub mod sink;
pub mod tools;
pub mod views;

pub use api::{FetchError, HttpMethod};
pub use boot::{boot, start};
pub use config::DashboardConfig;
pub use fragment::{load_fragment, FragmentError};
pub use poll::{PollLoop, PollSpec, PollView};
pub use sink::{ActivitySink, DeferredSink, DomSurfaces, EventSurfaces, RenderTarget};
