use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use luhar_api::admin::{RoleFilter, SuspensionFilter};
use luhar_core::models::Category;

#[derive(Parser)]
#[command(name = "luhar", version)]
#[command(about = "Browse movies, keep a watchlist, track what you watched")]
#[command(
    after_help = "Environment:\n  LUHAR_TMDB_API_KEY   TMDB API key (overrides api.api_key)\n  LUHAR_SESSION        Cookie string with the logged-in username\n  RUST_LOG             Log filter (overrides logging.filter)"
)]
pub struct Cli {
    /// Print machine-readable JSON instead of text where supported.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Browse a movie list.
    Browse {
        #[arg(long, value_enum, default_value_t = BrowseCategory::Popular)]
        category: BrowseCategory,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search movies by title.
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// List movie genres.
    Genres,
    /// Browse one genre by id.
    Genre {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show movie details.
    Movie { id: u64 },
    /// Show a person and their filmography.
    Person {
        id: u64,
        #[arg(long, default_value = "")]
        name: String,
    },
    /// Open a site link (`?search=` or `?movie=`).
    Open { url: String },
    /// Manage the watchlist.
    Watchlist {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Manage favorites.
    Favorites {
        #[command(subcommand)]
        action: Option<ListAction>,
    },
    /// Track watch progress.
    Watched {
        #[command(subcommand)]
        action: Option<WatchedAction>,
    },
    /// Show or change the avatar.
    Avatar {
        #[command(subcommand)]
        action: Option<AvatarAction>,
    },
    /// Show or toggle night mode.
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
    /// Log out and forget this user's lists.
    Logout,
    /// User administration.
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Share a movie.
    Share {
        id: u64,
        /// Copy the movie link to the clipboard.
        #[arg(long, default_value_t = false)]
        copy: bool,
        /// Open a share target in the browser.
        #[arg(long, value_enum)]
        open: Option<ShareTarget>,
    },
    /// Page through a list interactively.
    Interactive {
        #[arg(long, value_enum, default_value_t = BrowseCategory::Popular)]
        category: BrowseCategory,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum BrowseCategory {
    Popular,
    TopRated,
    Trending,
}

impl From<BrowseCategory> for Category {
    fn from(c: BrowseCategory) -> Self {
        match c {
            BrowseCategory::Popular => Category::Popular,
            BrowseCategory::TopRated => Category::TopRated,
            BrowseCategory::Trending => Category::Trending,
        }
    }
}

#[derive(Subcommand)]
pub enum ListAction {
    List,
    Add { id: u64, title: String },
    Remove { id: u64, title: String },
}

#[derive(Subcommand)]
pub enum WatchedAction {
    List,
    Mark {
        id: u64,
        title: String,
        /// Percent watched.
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(0..=100))]
        progress: u8,
    },
    Remove { id: u64, title: String },
}

#[derive(Subcommand)]
pub enum AvatarAction {
    Show,
    /// Use a local image (max 2MB).
    Set { path: PathBuf },
    /// Pick a preset avatar at random.
    Random,
}

#[derive(Subcommand)]
pub enum ThemeAction {
    Show,
    Toggle,
}

#[derive(Subcommand)]
pub enum AdminAction {
    Users {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, value_enum, default_value_t = RoleArg::All)]
        role: RoleArg,
        #[arg(long, value_enum, default_value_t = SuspensionArg::All)]
        suspension: SuspensionArg,
    },
    /// Suspend or reactivate a user.
    ToggleSuspension { username: String },
    Delete { username: String },
    ResetPassword { username: String, new_password: String },
    Promote { username: String },
    Demote { username: String },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RoleArg {
    All,
    Admin,
    User,
}

impl From<RoleArg> for RoleFilter {
    fn from(r: RoleArg) -> Self {
        match r {
            RoleArg::All => RoleFilter::All,
            RoleArg::Admin => RoleFilter::Admin,
            RoleArg::User => RoleFilter::User,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SuspensionArg {
    All,
    Suspended,
    Active,
}

impl From<SuspensionArg> for SuspensionFilter {
    fn from(s: SuspensionArg) -> Self {
        match s {
            SuspensionArg::All => SuspensionFilter::All,
            SuspensionArg::Suspended => SuspensionFilter::Suspended,
            SuspensionArg::Active => SuspensionFilter::Active,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ShareTarget {
    Link,
    Facebook,
    Twitter,
    Whatsapp,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_browse_defaults() {
        let cli = Cli::try_parse_from(["luhar", "browse", "--category", "top-rated"]).unwrap();
        match cli.command {
            Some(Command::Browse { category, page }) => {
                assert_eq!(Category::from(category), Category::TopRated);
                assert_eq!(page, 1);
            }
            _ => panic!("expected browse"),
        }
    }

    #[test]
    fn test_watched_progress_range() {
        assert!(Cli::try_parse_from(["luhar", "watched", "mark", "1", "Up", "--progress", "101"]).is_err());
        let cli = Cli::try_parse_from(["luhar", "watched", "mark", "1", "Up"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Watched {
                action: Some(WatchedAction::Mark { progress: 100, .. })
            })
        ));
    }
}
