//! The application page around the map: record lifecycle and page services.

pub mod collaborators;
pub mod lifecycle;
pub mod subscription;

pub use collaborators::{
    Backdrop, ModalOptions, ModalOutcome, ModalService, ModalSize, Navigator, Notifier, Route,
    TabLink, TAB_LINKS,
};
pub use lifecycle::{
    ApplicationMapController, LifecycleState, RecordSignal, FEATURE_GROUP_ID,
    LOAD_FAILURE_MESSAGE,
};
pub use subscription::Subscription;
