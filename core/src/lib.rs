//! Client core for the Taskdesk single-page app: REST models, the
//! token-refreshing HTTP client, session storage, view state and the role rules
//! that gate inline editing. Nothing here touches the DOM; the browser pieces
//! plug in through [`http::Transport`] and [`session::KeyValueStore`].

pub mod auth;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod models;
pub mod pagination;
pub mod permissions;
pub mod query;
pub mod session;
pub mod tasks;
pub mod theme;
pub mod toast;
pub mod users;

pub use auth::{AuthPhase, AuthState};
pub use config::ClientConfig;
pub use error::{ApiError, ValidationError};
pub use forms::{LoginForm, RegisterForm, TaskForm};
pub use http::{HttpClient, HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use models::{
    AuthResponse, Credentials, NewTask, Priority, Registration, Role, Status, Task, TaskId,
    TaskPage, TaskPatch, User, UserId,
};
pub use pagination::Pagination;
pub use permissions::{RowPermissions, TaskField};
pub use query::{DashboardUrl, HistoryMode, QueryChange, SortKey, ViewQuery, ViewQueryController};
pub use session::{KeyValueStore, MemoryStore, SessionStore};
pub use tasks::{FetchOutcome, FetchTicket, TaskState};
pub use theme::Theme;
pub use toast::{Toast, ToastQueue};
pub use users::UserDirectory;
