use std::collections::HashSet;

use sauron::prelude::*;
use taskdesk_core::forms::cell_patch;
use taskdesk_core::permissions::can_manage_users;
use taskdesk_core::query::UrlUpdate;
use taskdesk_core::{
    ApiError, AuthState, ClientConfig, FetchOutcome, FetchTicket, HistoryMode, HttpClient,
    LoginForm, Priority, QueryChange, RegisterForm, Role, RowPermissions, SessionStore, Task,
    TaskField, TaskForm, TaskId, TaskPage, TaskPatch, TaskState, Theme, ToastQueue, User,
    UserDirectory, UserId, ViewQuery, ViewQueryController,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

mod browser;
mod logging;
mod storage;
mod transport;
mod views;

use storage::LocalStorage;
use transport::FetchTransport;

type Api = HttpClient<FetchTransport>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Admin,
    Login,
    Register,
}

impl Route {
    fn to_path(self) -> &'static str {
        match self {
            Route::Dashboard => "/",
            Route::Admin => "/admin",
            Route::Login => "/login",
            Route::Register => "/register",
        }
    }

    fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/admin" => Route::Admin,
            "/login" => Route::Login,
            "/register" => Route::Register,
            _ => Route::Dashboard,
        }
    }

    fn requires_auth(self) -> bool {
        matches!(self, Route::Dashboard | Route::Admin)
    }
}

#[derive(Debug, Clone)]
pub enum Msg {
    Noop,
    // Navigation
    NavigateTo(Route),
    UrlChanged,
    KeyPressed(String),

    // Auth
    SetLoginEmail(String),
    SetLoginPassword(String),
    SubmitLogin,
    SetRegisterName(String),
    SetRegisterEmail(String),
    SetRegisterPassword(String),
    SubmitRegister,
    AuthFinished(Result<User, ApiError>),
    Logout,
    LoggedOut,

    // Task list
    ChangeQuery(QueryChange),
    TasksLoaded(FetchTicket, Result<TaskPage, ApiError>),
    EditCell(TaskId, TaskField, String),
    TaskUpdated(TaskId, Result<Task, ApiError>),
    DeleteTask(TaskId),
    TaskDeleted(TaskId, Result<(), ApiError>),

    // Create modal
    OpenNewTask,
    CloseNewTask,
    SetTaskTitle(String),
    SetTaskDescription(String),
    SetTaskPriority(String),
    SetTaskDueDate(String),
    SetTaskAssignee(String),
    SetTeamSearch(String),
    ToggleTeamMember(UserId),
    SubmitNewTask,
    TaskCreated(Result<Task, ApiError>),

    // Users
    UsersLoaded(Result<Vec<User>, ApiError>),
    ChangeRole(UserId, String),
    RoleChanged(UserId, Result<User, ApiError>),

    // Chrome
    ToggleTheme,
    DismissToast(Uuid),
}

pub struct Model {
    api: Api,
    route: Route,
    auth: AuthState,
    tasks: TaskState,
    users: UserDirectory,
    view: ViewQueryController,
    theme: Theme,
    toasts: ToastQueue,
    login_form: LoginForm,
    register_form: RegisterForm,
    task_form: TaskForm,
    creating: bool,
    role_busy: HashSet<UserId>,
}

impl Default for Model {
    fn default() -> Self {
        let session = SessionStore::new(LocalStorage);
        let api = HttpClient::new(FetchTransport, session, ClientConfig::from_env());
        let auth = AuthState::bootstrap(api.session());
        Self {
            api,
            route: Route::Login,
            auth,
            tasks: TaskState::new(),
            users: UserDirectory::default(),
            view: ViewQueryController::new(),
            theme: Theme::resolve(&LocalStorage, browser::prefers_dark()),
            toasts: ToastQueue::new(),
            login_form: LoginForm::default(),
            register_form: RegisterForm::default(),
            task_form: TaskForm::default(),
            creating: false,
            role_busy: HashSet::new(),
        }
    }
}

/// Waits for the next back/forward navigation.
fn watch_history() -> Cmd<Msg> {
    Cmd::new(async {
        if browser::next_popstate().await {
            Msg::UrlChanged
        } else {
            Msg::Noop
        }
    })
}

/// Waits for the next key press anywhere on the page.
fn watch_keys() -> Cmd<Msg> {
    Cmd::new(async {
        match browser::next_keydown().await {
            Some(key) => Msg::KeyPressed(key),
            None => Msg::Noop,
        }
    })
}

impl Application for Model {
    type MSG = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        browser::apply_theme(self.theme);
        let route = Route::from_path(&browser::location_pathname());
        Cmd::batch(vec![self.enter(route), watch_history(), watch_keys()])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Noop => Cmd::none(),
            Msg::NavigateTo(route) => self.navigate(route, HistoryMode::Push),
            Msg::UrlChanged => {
                let route = Route::from_path(&browser::location_pathname());
                Cmd::batch(vec![self.enter(route), watch_history()])
            }
            Msg::KeyPressed(key) => {
                if self.route == Route::Dashboard {
                    if let Some(update) = self.view.dismiss_on_key(&key) {
                        write_dashboard_url(&update);
                    }
                }
                watch_keys()
            }

            Msg::SetLoginEmail(email) => {
                self.login_form.email = email;
                Cmd::none()
            }
            Msg::SetLoginPassword(password) => {
                self.login_form.password = password;
                Cmd::none()
            }
            Msg::SubmitLogin => {
                if self.auth.is_loading() {
                    return Cmd::none();
                }
                match self.login_form.validate() {
                    Ok(credentials) => {
                        self.auth.begin();
                        let api = self.api.clone();
                        Cmd::new(async move { Msg::AuthFinished(api.login(&credentials).await) })
                    }
                    Err(e) => self.toast(e.to_string()),
                }
            }
            Msg::SetRegisterName(name) => {
                self.register_form.name = name;
                Cmd::none()
            }
            Msg::SetRegisterEmail(email) => {
                self.register_form.email = email;
                Cmd::none()
            }
            Msg::SetRegisterPassword(password) => {
                self.register_form.password = password;
                Cmd::none()
            }
            Msg::SubmitRegister => {
                if self.auth.is_loading() {
                    return Cmd::none();
                }
                match self.register_form.validate() {
                    Ok(registration) => {
                        self.auth.begin();
                        let api = self.api.clone();
                        Cmd::new(
                            async move { Msg::AuthFinished(api.register(&registration).await) },
                        )
                    }
                    Err(e) => self.toast(e.to_string()),
                }
            }
            Msg::AuthFinished(result) => {
                self.auth.finish(result);
                if self.auth.is_authenticated() {
                    info!(user = ?self.auth.user_id(), "signed in");
                    self.login_form = LoginForm::default();
                    self.register_form = RegisterForm::default();
                    self.navigate(Route::Dashboard, HistoryMode::Replace)
                } else {
                    Cmd::none()
                }
            }
            Msg::Logout => {
                let api = self.api.clone();
                Cmd::new(async move {
                    api.logout().await;
                    Msg::LoggedOut
                })
            }
            Msg::LoggedOut => {
                self.auth.logged_out();
                self.reset_session_state();
                self.navigate(Route::Login, HistoryMode::Replace)
            }

            Msg::ChangeQuery(change) => {
                let transition = self.view.change(change);
                if let Some(update) = transition.url {
                    write_dashboard_url(&update);
                }
                self.fetch_if(transition.fetch)
            }
            Msg::TasksLoaded(ticket, result) => {
                if matches!(&result, Err(e) if e.is_session_expired()) {
                    return self.expire_session();
                }
                let failure = result.as_ref().err().map(ApiError::user_message);
                match (self.tasks.apply_fetch(ticket, result), failure) {
                    (FetchOutcome::Applied, Some(message)) => self.toast(message),
                    _ => Cmd::none(),
                }
            }
            Msg::EditCell(id, field, raw) => self.edit_cell(id, field, &raw),
            Msg::TaskUpdated(id, result) => match result {
                Ok(task) => {
                    self.tasks.apply_updated(task);
                    Cmd::none()
                }
                Err(e) => {
                    self.tasks.apply_failed(&id);
                    self.fail(e)
                }
            },
            Msg::DeleteTask(id) => {
                if self.tasks.is_busy(&id) || !browser::confirm("Delete this task?") {
                    return Cmd::none();
                }
                self.tasks.mark_busy(id.clone());
                let api = self.api.clone();
                Cmd::new(async move {
                    let result = api.delete_task(&id).await;
                    Msg::TaskDeleted(id, result)
                })
            }
            Msg::TaskDeleted(id, result) => match result {
                Ok(()) => {
                    self.tasks.apply_deleted(&id);
                    self.toast("Task deleted")
                }
                Err(e) => {
                    self.tasks.apply_failed(&id);
                    self.fail(e)
                }
            },

            Msg::OpenNewTask => {
                if let Some(update) = self.view.set_new_task_open(true) {
                    write_dashboard_url(&update);
                }
                self.prepare_task_form()
            }
            Msg::CloseNewTask => {
                if let Some(update) = self.view.set_new_task_open(false) {
                    write_dashboard_url(&update);
                }
                Cmd::none()
            }
            Msg::SetTaskTitle(value) => {
                self.task_form.title = value;
                Cmd::none()
            }
            Msg::SetTaskDescription(value) => {
                self.task_form.description = value;
                Cmd::none()
            }
            Msg::SetTaskPriority(value) => {
                if let Ok(priority) = value.parse::<Priority>() {
                    self.task_form.priority = priority;
                }
                Cmd::none()
            }
            Msg::SetTaskDueDate(value) => {
                self.task_form.due_date = value;
                Cmd::none()
            }
            Msg::SetTaskAssignee(value) => {
                self.task_form.assignee = value;
                Cmd::none()
            }
            Msg::SetTeamSearch(value) => {
                self.task_form.team_search = value;
                Cmd::none()
            }
            Msg::ToggleTeamMember(id) => {
                self.task_form.toggle_team_member(&id);
                Cmd::none()
            }
            Msg::SubmitNewTask => {
                let Some(me) = self.auth.user.clone() else {
                    return Cmd::none();
                };
                if self.creating {
                    return Cmd::none();
                }
                match self.task_form.validate(&me) {
                    Ok(new_task) => {
                        self.creating = true;
                        let api = self.api.clone();
                        Cmd::new(async move { Msg::TaskCreated(api.create_task(&new_task).await) })
                    }
                    Err(e) => self.toast(e.to_string()),
                }
            }
            Msg::TaskCreated(result) => {
                self.creating = false;
                match result {
                    Ok(task) => {
                        self.tasks.apply_created(task);
                        if let Some(update) = self.view.set_new_task_open(false) {
                            write_dashboard_url(&update);
                        }
                        self.toast("Task created")
                    }
                    Err(e) => self.fail(e),
                }
            }

            Msg::UsersLoaded(result) => match result {
                Ok(users) => {
                    debug!(count = users.len(), "user directory loaded");
                    self.users.replace_all(users);
                    Cmd::none()
                }
                Err(e) => {
                    self.users.loading = false;
                    if e.is_session_expired() {
                        return self.expire_session();
                    }
                    if self.auth.role().is_some_and(can_manage_users) {
                        self.toast(e.user_message())
                    } else {
                        warn!("user directory unavailable: {e}");
                        Cmd::none()
                    }
                }
            },
            Msg::ChangeRole(id, raw) => {
                let Ok(role) = raw.parse::<Role>() else {
                    return Cmd::none();
                };
                let unchanged = self
                    .users
                    .users()
                    .iter()
                    .any(|user| user.id == id && user.role == role);
                if unchanged || !self.role_busy.insert(id.clone()) {
                    return Cmd::none();
                }
                let api = self.api.clone();
                Cmd::new(async move {
                    let result = api.update_user_role(&id, role).await;
                    Msg::RoleChanged(id, result)
                })
            }
            Msg::RoleChanged(id, result) => {
                self.role_busy.remove(&id);
                match result {
                    Ok(user) => self.role_changed(user),
                    Err(e) => self.fail(e),
                }
            }

            Msg::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.theme.persist(&LocalStorage);
                browser::apply_theme(self.theme);
                Cmd::none()
            }
            Msg::DismissToast(id) => {
                self.toasts.dismiss(id);
                Cmd::none()
            }
        }
    }

    fn view(&self) -> Node<Msg> {
        self.view_app()
    }
}

fn write_dashboard_url(update: &UrlUpdate) {
    browser::write_url(Route::Dashboard.to_path(), &update.search, update.mode);
}

impl Model {
    fn is_admin(&self) -> bool {
        self.auth.role().is_some_and(can_manage_users)
    }

    /// Where `requested` actually lands for the current session.
    fn guard(&self, requested: Route) -> Route {
        let signed_in = self.auth.is_authenticated();
        match requested {
            route if route.requires_auth() && !signed_in => Route::Login,
            Route::Login | Route::Register if signed_in => Route::Dashboard,
            Route::Admin if !self.is_admin() => Route::Dashboard,
            route => route,
        }
    }

    fn navigate(&mut self, route: Route, mode: HistoryMode) -> Cmd<Msg> {
        browser::write_url(route.to_path(), "", mode);
        self.enter(route)
    }

    /// Activates a route after the address bar already points at it.
    fn enter(&mut self, requested: Route) -> Cmd<Msg> {
        let route = self.guard(requested);
        if route != requested {
            debug!(?requested, ?route, "redirected");
            browser::write_url(route.to_path(), "", HistoryMode::Replace);
        }
        let previous = std::mem::replace(&mut self.route, route);

        match route {
            Route::Dashboard => {
                let was_open = self.view.new_task_open();
                let transition = self.view.sync_from_url(&browser::location_search());
                let fetch = if previous == Route::Dashboard {
                    transition.fetch
                } else {
                    Some(self.view.reload())
                };
                let mut cmds = vec![self.fetch_if(fetch)];
                if self.is_admin() && previous != Route::Dashboard {
                    cmds.push(self.load_users());
                }
                if self.view.new_task_open() && !was_open {
                    cmds.push(self.prepare_task_form());
                }
                Cmd::batch(cmds)
            }
            Route::Admin => {
                self.tasks.cancel_fetches();
                self.load_users()
            }
            Route::Login | Route::Register => {
                self.tasks.cancel_fetches();
                Cmd::none()
            }
        }
    }

    fn fetch_if(&mut self, query: Option<ViewQuery>) -> Cmd<Msg> {
        let Some(query) = query else {
            return Cmd::none();
        };
        let ticket = self.tasks.begin_fetch();
        let api = self.api.clone();
        Cmd::new(async move { Msg::TasksLoaded(ticket, api.fetch_tasks(&query).await) })
    }

    fn load_users(&mut self) -> Cmd<Msg> {
        if self.users.loading {
            return Cmd::none();
        }
        self.users.loading = true;
        let api = self.api.clone();
        Cmd::new(async move { Msg::UsersLoaded(api.list_users().await) })
    }

    /// Resets the create form; managers fetch the directory for the team picker.
    fn prepare_task_form(&mut self) -> Cmd<Msg> {
        let Some(me) = &self.auth.user else {
            return Cmd::none();
        };
        self.task_form = TaskForm::for_creator(me);
        let needs_directory = me.role == Role::Manager && self.users.users().is_empty();
        if needs_directory {
            self.load_users()
        } else {
            Cmd::none()
        }
    }

    fn edit_cell(&mut self, id: TaskId, field: TaskField, raw: &str) -> Cmd<Msg> {
        let (Some(task), Some(me)) = (self.tasks.get(&id), self.auth.user.as_ref()) else {
            return Cmd::none();
        };
        if self.tasks.is_busy(&id) || !RowPermissions::for_task(me.role, task, &me.id).allows(field) {
            return Cmd::none();
        }
        let patch: TaskPatch = match cell_patch(task, field, raw) {
            Ok(Some(patch)) => patch,
            Ok(None) => return Cmd::none(),
            Err(e) => return self.toast(e.to_string()),
        };

        self.tasks.mark_busy(id.clone());
        let api = self.api.clone();
        Cmd::new(async move {
            let result = api.update_task(&id, &patch).await;
            Msg::TaskUpdated(id, result)
        })
    }

    fn role_changed(&mut self, user: User) -> Cmd<Msg> {
        let is_me = self.auth.user_id() == Some(&user.id);
        self.users.apply_updated(user.clone());
        if is_me {
            self.api.session().persist_user(&user);
            self.auth.user = Some(user);
            if self.route == Route::Admin && !self.is_admin() {
                let toast = self.toast("Role updated");
                return Cmd::batch(vec![toast, self.navigate(Route::Dashboard, HistoryMode::Replace)]);
            }
        }
        self.toast("Role updated")
    }

    fn reset_session_state(&mut self) {
        self.tasks = TaskState::new();
        self.users.clear();
        self.view = ViewQueryController::new();
        self.task_form = TaskForm::default();
        self.role_busy.clear();
        self.creating = false;
    }

    /// The refresh path already cleared storage; drop in-memory state and go to login.
    fn expire_session(&mut self) -> Cmd<Msg> {
        warn!("session expired");
        self.auth.session_expired();
        self.reset_session_state();
        self.navigate(Route::Login, HistoryMode::Replace)
    }

    fn fail(&mut self, error: ApiError) -> Cmd<Msg> {
        if error.is_session_expired() {
            return self.expire_session();
        }
        warn!("request failed: {error}");
        self.toast(error.user_message())
    }

    fn toast(&mut self, message: impl Into<String>) -> Cmd<Msg> {
        let id = self.toasts.push(message);
        let delay = self.api.config().toast_duration_ms;
        Cmd::new(async move {
            browser::sleep(delay).await;
            Msg::DismissToast(id)
        })
    }
}

#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init();
    Program::mount_to_body(Model::default());
}
