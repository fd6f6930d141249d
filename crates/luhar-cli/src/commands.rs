use std::process::ExitCode;

use serde::Serialize;

use luhar_api::admin::{AdminError, UserFilter};
use luhar_api::share::ShareLinks;
use luhar_core::models::ListKind;
use luhar_runtime::library::LOGIN_REQUIRED;
use luhar_runtime::render::{self, DETAIL_ERROR, LIST_ERROR, PERSON_ERROR};
use luhar_runtime::{InitialView, ListPage, Notification, Runtime, RuntimeError};

use crate::cli::{
    AdminAction, AvatarAction, Cli, Command, ListAction, ShareTarget, ThemeAction, WatchedAction,
};
use crate::{interactive, paint};

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
    #[error("admin request failed: {0}")]
    Admin(#[from] AdminError),
    #[error("JSON output failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Text or JSON, depending on `--json`.
pub struct Output {
    pub json: bool,
}

impl Output {
    pub fn emit<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            print!("{}", text(value));
        }
        Ok(())
    }

    /// Print a notification and turn it into an exit code.
    pub fn notify(&self, n: &Notification) -> Result<ExitCode, CliError> {
        self.emit(n, |n| format!("{}\n", paint::notification(n)))?;
        Ok(if n.is_error() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }
}

pub async fn run(cli: Cli, rt: &mut Runtime) -> Result<ExitCode, CliError> {
    let out = Output { json: cli.json };
    let Some(command) = cli.command else {
        let first = rt.controller.go_home().await;
        return show_list(rt, &out, first);
    };

    match command {
        Command::Browse { category, page } => {
            let first = rt.controller.set_category(category.into(), "").await;
            let result = jump(rt, first, page).await;
            show_list(rt, &out, result)
        }
        Command::Search { query, page } => {
            let first = rt.controller.search(&query).await;
            let result = jump(rt, first, page).await;
            show_list(rt, &out, result)
        }
        Command::Genres => {
            let genres = rt.controller.load_genres().await?;
            out.emit(&genres, |g| paint::genres(g))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Genre { id, page } => {
            let first = rt.controller.select_genre(&id).await;
            let result = jump(rt, first, page).await;
            show_list(rt, &out, result)
        }
        Command::Movie { id } => show_movie(rt, &out, id).await,
        Command::Person { id, name } => show_person(rt, &out, id, &name).await,
        Command::Open { url } => match InitialView::from_url(&url) {
            InitialView::Home => {
                let first = rt.controller.go_home().await;
                show_list(rt, &out, first)
            }
            InitialView::Search(query) => {
                let first = rt.controller.search(&query).await;
                show_list(rt, &out, first)
            }
            InitialView::Movie(id) => show_movie(rt, &out, id).await,
        },
        Command::Watchlist { action } => list_command(rt, &out, ListKind::Watchlist, action),
        Command::Favorites { action } => list_command(rt, &out, ListKind::Favorites, action),
        Command::Watched { action } => watched_command(rt, &out, action),
        Command::Avatar { action } => avatar_command(rt, &out, action),
        Command::Theme { action } => {
            let mode = match action.unwrap_or(ThemeAction::Show) {
                ThemeAction::Show => rt.library.night_mode()?,
                ThemeAction::Toggle => rt.library.toggle_night_mode()?,
            };
            out.emit(&mode.as_db_str(), |m| format!("Night mode: {m}\n"))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            let n = rt.library.logout()?;
            out.notify(&n)
        }
        Command::Admin { action } => admin_command(rt, &out, action).await,
        Command::Share { id, copy, open } => share_command(rt, &out, id, copy, open).await,
        Command::Interactive { category } => interactive::run(rt, category.into()).await,
    }
}

/// Follow a category switch with a jump to `page` (ignored if out of range).
async fn jump(
    rt: &mut Runtime,
    first: Result<ListPage, RuntimeError>,
    page: u32,
) -> Result<ListPage, RuntimeError> {
    let first = first?;
    if page <= 1 {
        return Ok(first);
    }
    match rt.controller.go_to_page(page).await? {
        Some(list) => Ok(list),
        None => {
            tracing::info!(
                page,
                total = rt.controller.state().total_pages,
                "Page out of range, staying on page 1"
            );
            Ok(first)
        }
    }
}

pub fn show_list(
    rt: &Runtime,
    out: &Output,
    result: Result<ListPage, RuntimeError>,
) -> Result<ExitCode, CliError> {
    match result {
        Ok(page) => {
            let ctx = rt.render_context()?;
            let view = render::list_view(&page, &ctx);
            out.emit(&view, paint::list)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(RuntimeError::Fetch(_)) => out.notify(&Notification::error(LIST_ERROR)),
        Err(e @ (RuntimeError::EmptyQuery | RuntimeError::UnknownGenre(_))) => {
            out.notify(&Notification::error(e.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn show_movie(rt: &Runtime, out: &Output, id: u64) -> Result<ExitCode, CliError> {
    match rt.controller.open_movie(id).await {
        Ok(bundle) => {
            let ctx = rt.render_context()?;
            let view = render::movie_detail_view(&bundle, &ctx);
            out.emit(&view, paint::movie)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(RuntimeError::Fetch(_)) => out.notify(&Notification::error(DETAIL_ERROR)),
        Err(e) => Err(e.into()),
    }
}

async fn show_person(rt: &Runtime, out: &Output, id: u64, name: &str) -> Result<ExitCode, CliError> {
    match rt.controller.open_person(id, name).await {
        Ok(bundle) => {
            let ctx = rt.render_context()?;
            let view = render::person_view(&bundle, &ctx);
            out.emit(&view, paint::person)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(RuntimeError::Fetch(_)) => out.notify(&Notification::error(PERSON_ERROR)),
        Err(e) => Err(e.into()),
    }
}

fn list_command(
    rt: &Runtime,
    out: &Output,
    list: ListKind,
    action: Option<ListAction>,
) -> Result<ExitCode, CliError> {
    let n = match (action.unwrap_or(ListAction::List), list) {
        (ListAction::List, _) => {
            return match rt.library.records(list) {
                Ok(records) => {
                    out.emit(&records, |r| paint::records(list.as_str(), r))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(RuntimeError::NotLoggedIn) => out.notify(&Notification::error(LOGIN_REQUIRED)),
                Err(e) => Err(e.into()),
            };
        }
        (ListAction::Add { id, title }, ListKind::Favorites) => {
            rt.library.add_to_favorites(id, &title)?
        }
        (ListAction::Add { id, title }, _) => rt.library.add_to_watchlist(id, &title)?,
        (ListAction::Remove { id, title }, ListKind::Favorites) => {
            rt.library.remove_from_favorites(id, &title)?
        }
        (ListAction::Remove { id, title }, _) => rt.library.remove_from_watchlist(id, &title)?,
    };
    out.notify(&n)
}

fn watched_command(
    rt: &Runtime,
    out: &Output,
    action: Option<WatchedAction>,
) -> Result<ExitCode, CliError> {
    let n = match action.unwrap_or(WatchedAction::List) {
        WatchedAction::List => {
            return match rt.library.watched() {
                Ok(records) => {
                    out.emit(&records, |r| paint::watched(r))?;
                    Ok(ExitCode::SUCCESS)
                }
                Err(RuntimeError::NotLoggedIn) => out.notify(&Notification::error(
                    luhar_runtime::library::LOGIN_REQUIRED_WATCHED,
                )),
                Err(e) => Err(e.into()),
            };
        }
        WatchedAction::Mark {
            id,
            title,
            progress,
        } => rt.library.mark_watched(id, &title, progress)?,
        WatchedAction::Remove { id, title } => rt.library.remove_from_watched(id, &title)?,
    };
    out.notify(&n)
}

fn avatar_command(
    rt: &Runtime,
    out: &Output,
    action: Option<AvatarAction>,
) -> Result<ExitCode, CliError> {
    let n = match action.unwrap_or(AvatarAction::Show) {
        AvatarAction::Show => {
            return match rt.library.current_avatar()? {
                Some(url) => {
                    out.emit(&url, |u| format!("{u}\n"))?;
                    Ok(ExitCode::SUCCESS)
                }
                None => out.notify(&Notification::error(
                    luhar_runtime::library::LOGIN_REQUIRED_AVATAR,
                )),
            };
        }
        AvatarAction::Set { path } => rt.library.set_avatar_from_file(&path)?,
        AvatarAction::Random => rt.library.choose_preset_avatar()?,
    };
    out.notify(&n)
}

async fn admin_command(
    rt: &Runtime,
    out: &Output,
    action: AdminAction,
) -> Result<ExitCode, CliError> {
    let result = match action {
        AdminAction::Users {
            search,
            role,
            suspension,
        } => {
            let filter = UserFilter {
                search,
                role: role.into(),
                suspension: suspension.into(),
            };
            let users = rt.admin.list_users(&filter).await?;
            out.emit(&users, |u| paint::users(u))?;
            return Ok(ExitCode::SUCCESS);
        }
        AdminAction::ToggleSuspension { username } => rt.admin.toggle_suspension(&username).await,
        AdminAction::Delete { username } => rt.admin.delete_user(&username).await,
        AdminAction::ResetPassword {
            username,
            new_password,
        } => rt.admin.reset_password(&username, &new_password).await,
        AdminAction::Promote { username } => rt.admin.toggle_admin(&username, true).await,
        AdminAction::Demote { username } => rt.admin.toggle_admin(&username, false).await,
    };

    let n = match result {
        Ok(message) => Notification::success(message),
        Err(AdminError::Rejected { message, .. }) => Notification::error(format!("Error: {message}")),
        Err(AdminError::InvalidInput(message)) => Notification::error(message),
        Err(e) => return Err(e.into()),
    };
    out.notify(&n)
}

async fn share_command(
    rt: &Runtime,
    out: &Output,
    id: u64,
    copy: bool,
    open: Option<ShareTarget>,
) -> Result<ExitCode, CliError> {
    let bundle = match rt.controller.open_movie(id).await {
        Ok(bundle) => bundle,
        Err(RuntimeError::Fetch(_)) => return out.notify(&Notification::error(DETAIL_ERROR)),
        Err(e) => return Err(e.into()),
    };
    let title = &bundle.movie.title;
    let links = ShareLinks::build(
        &rt.config.share.site_origin,
        &rt.config.share.site_name,
        id,
        title,
    );
    out.emit(&links, |l| {
        format!(
            "Link:      {}\nFacebook:  {}\nTwitter:   {}\nWhatsApp:  {}\n",
            l.movie, l.facebook, l.twitter, l.whatsapp
        )
    })?;

    let mut code = ExitCode::SUCCESS;
    if copy {
        let copied = arboard::Clipboard::new().and_then(|mut c| c.set_text(links.movie.clone()));
        let n = match copied {
            Ok(()) => Notification::success(format!("Copied link to {title}!")),
            Err(e) => {
                tracing::warn!(error = %e, "Clipboard unavailable");
                Notification::error("Failed to copy link")
            }
        };
        code = out.notify(&n)?;
    }
    if let Some(target) = open {
        let url = match target {
            ShareTarget::Link => &links.movie,
            ShareTarget::Facebook => &links.facebook,
            ShareTarget::Twitter => &links.twitter,
            ShareTarget::Whatsapp => &links.whatsapp,
        };
        open::that(url)?;
    }
    Ok(code)
}
