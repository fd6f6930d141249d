//! Plain-text rendering of view models.

use std::fmt::Write;

use luhar_api::admin::AdminUser;
use luhar_api::tmdb::types::Genre;
use luhar_core::models::{ListRecord, WatchedRecord};
use luhar_core::pagination::PagerItem;
use luhar_runtime::render::{ListView, MovieDetailView, PersonView};
use luhar_runtime::{Notification, NotificationKind};

pub fn notification(n: &Notification) -> String {
    let tag = match n.kind {
        NotificationKind::Success => "ok",
        NotificationKind::Error => "error",
        NotificationKind::Info => "info",
    };
    format!("[{tag}] {}", n.message)
}

/// `‹ 1 … 4 5 [6] 7 8 … 500 ›`; empty when there is a single page.
pub fn pager(items: &[PagerItem]) -> String {
    items
        .iter()
        .map(|item| match *item {
            PagerItem::Prev { enabled: true } => "‹".to_string(),
            PagerItem::Prev { enabled: false } => "·".to_string(),
            PagerItem::Next { enabled: true } => "›".to_string(),
            PagerItem::Next { enabled: false } => "·".to_string(),
            PagerItem::Page {
                number,
                active: true,
            } => format!("[{number}]"),
            PagerItem::Page { number, .. } => number.to_string(),
            PagerItem::Ellipsis => "…".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn list(view: &ListView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", view.title);
    let _ = writeln!(out, "{}", "=".repeat(view.title.chars().count()));
    if let Some(message) = view.empty_message {
        let _ = writeln!(out, "{message}");
        return out;
    }
    for card in &view.cards {
        let watched = card
            .watched_progress
            .map(|p| format!("  [watched {p}%]"))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>8}  {}  ({}, {}){watched}",
            card.id, card.title, card.release_date, card.rating
        );
    }
    let pager = pager(&view.pager);
    if !pager.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{pager}");
    }
    out
}

pub fn movie(view: &MovieDetailView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.title, view.id);
    if let Some(tagline) = &view.tagline {
        let _ = writeln!(out, "\"{tagline}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Release Date:          {}", view.release_date);
    let _ = writeln!(out, "Rating:                {}", view.rating);
    let _ = writeln!(out, "Genres:                {}", view.genres);
    let _ = writeln!(out, "Runtime:               {}", view.runtime);
    let _ = writeln!(out, "Parental Rating (US):  {}", view.certification);
    if let Some(director) = &view.director {
        let _ = writeln!(out, "Director:              {} ({})", director.name, director.id);
    }
    let _ = writeln!(out, "Budget:                {}", view.budget);
    let _ = writeln!(out, "Revenue:               {}", view.revenue);
    let _ = writeln!(out, "Production Companies:  {}", view.production_companies);
    let _ = writeln!(out, "Languages:             {}", view.languages);
    let _ = writeln!(out, "Poster:                {}", view.poster_url);
    if let Some(backdrop) = &view.backdrop_url {
        let _ = writeln!(out, "Backdrop:              {backdrop}");
    }
    if let Some(trailer) = &view.trailer_url {
        let _ = writeln!(out, "Trailer:               {trailer}");
    }
    if let Some(watched) = &view.watched {
        let _ = writeln!(
            out,
            "Progress:              {}%  ({}{})",
            watched.progress,
            watched.label,
            if watched.removable {
                ", removable"
            } else {
                ""
            }
        );
    }

    let _ = writeln!(out, "\nOverview\n{}", view.overview);

    if !view.cast.is_empty() {
        let _ = writeln!(out, "\nCast");
        for member in &view.cast {
            let _ = writeln!(out, "{:>8}  {} as {}", member.id, member.name, member.character);
        }
    }
    if !view.recommendations.is_empty() {
        let _ = writeln!(out, "\nRecommended Movies");
        for rec in &view.recommendations {
            let _ = writeln!(out, "{:>8}  {}", rec.id, rec.title);
        }
    }
    let _ = writeln!(out, "\nShare: {}", view.share.movie);
    out
}

pub fn person(view: &PersonView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} ({})", view.name, view.id);
    if let Some(born) = &view.born {
        let _ = writeln!(out, "{born}");
    }
    let _ = writeln!(out, "Known For: {}", view.known_for);
    let _ = writeln!(out, "Photo: {}", view.profile_url);
    let _ = writeln!(out, "\nBiography\n{}", view.biography);
    let _ = writeln!(out, "\nFilmography");
    if view.filmography.is_empty() {
        let _ = writeln!(out, "No filmography available.");
    }
    for entry in &view.filmography {
        let _ = writeln!(
            out,
            "{:>8}  {} ({})  {}",
            entry.id, entry.title, entry.year, entry.role
        );
    }
    out
}

pub fn genres(genres: &[Genre]) -> String {
    genres
        .iter()
        .map(|g| format!("{:>6}  {}\n", g.id, g.name))
        .collect()
}

pub fn records(title: &str, records: &[ListRecord]) -> String {
    if records.is_empty() {
        return format!("Your {} is empty.\n", title.to_lowercase());
    }
    records
        .iter()
        .map(|r| format!("{:>8}  {}\n", r.id, r.title))
        .collect()
}

pub fn watched(records: &[WatchedRecord]) -> String {
    if records.is_empty() {
        return "Your watched list is empty.\n".to_string();
    }
    records
        .iter()
        .map(|r| {
            format!(
                "{:>8}  {}  {}%  {}\n",
                r.id,
                r.title,
                r.progress,
                r.last_watched.format("%Y-%m-%d %H:%M")
            )
        })
        .collect()
}

pub fn users(users: &[AdminUser]) -> String {
    if users.is_empty() {
        return "No users found matching filters.\n".to_string();
    }
    let or_na = |s: &str| if s.is_empty() { "N/A".to_string() } else { s.to_string() };
    users
        .iter()
        .map(|u| {
            format!(
                "{:<16} {:<28} {:<16} {:<6} {}\n",
                u.username,
                or_na(&u.email),
                or_na(&u.phone),
                u.role_label(),
                u.status_label()
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use luhar_core::pagination::compute_window;

    use super::*;

    #[test]
    fn test_pager_line() {
        assert_eq!(pager(&compute_window(1, 10, 5).items()), "· [1] 2 3 4 5 … 10 ›");
        assert_eq!(pager(&compute_window(10, 10, 5).items()), "‹ 1 … 6 7 8 9 [10] ·");
        assert_eq!(pager(&compute_window(1, 1, 5).items()), "");
    }

    #[test]
    fn test_notification_tags() {
        assert_eq!(
            notification(&Notification::error("Please log in to use this feature.")),
            "[error] Please log in to use this feature."
        );
    }

    #[test]
    fn test_empty_lists() {
        assert_eq!(records("Watchlist", &[]), "Your watchlist is empty.\n");
        assert_eq!(users(&[]), "No users found matching filters.\n");
    }
}
