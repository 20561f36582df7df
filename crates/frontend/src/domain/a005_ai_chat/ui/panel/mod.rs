//! AI assistant side panel (MVVM)
//!
//! - model.rs: stream handler writing into the view model
//! - view_model.rs: ChatPanelVm with RwSignals
//! - view.rs: ChatPanel component

mod model;
mod view;
mod view_model;

pub use view::ChatPanel;
pub use view_model::ChatPanelVm;
