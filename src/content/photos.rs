//! Photo gallery.
//!
//! A terminal cannot show the pictures themselves, so each photo is listed by
//! name and size with a detail view for the selected one. Entries whose file
//! is missing or unreadable are hidden.

use std::path::{Path, PathBuf};

use crossterm::event::{Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind};
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Paragraph, Wrap};

use super::{PanelContent, PhotoPair};
use crate::components::{Component, ComponentContext, center_in, pad_to};
use crate::layout::rect_contains;
use crate::theme;
use crate::ui::UiFrame;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

pub const EMPTY_MESSAGE: &str = "No photos yet. Add images to the photo memory folder.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoEntry {
    pub name: String,
    pub path: PathBuf,
    pub bytes: u64,
}

impl PhotoEntry {
    fn probe(path: PathBuf) -> Option<Self> {
        let meta = match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta,
            Ok(_) => {
                tracing::debug!(path = %path.display(), "photo is not a file, hiding");
                return None;
            }
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "photo unavailable, hiding");
                return None;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Some(Self {
            name,
            path,
            bytes: meta.len(),
        })
    }

    pub fn size_label(&self) -> String {
        match self.bytes {
            b if b >= 1024 * 1024 => format!("{:.1} MB", b as f64 / (1024.0 * 1024.0)),
            b if b >= 1024 => format!("{} KB", b / 1024),
            b => format!("{b} B"),
        }
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

fn resolve(dir: Option<&Path>, name: &str) -> PathBuf {
    match dir {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

fn scan_dir(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::debug!(dir = %dir.display(), error = %err, "photo directory unreadable");
            return Vec::new();
        }
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|e| e.path())
        .filter(|p| is_image(p))
        .collect();
    paths.sort();
    paths
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    List,
    Detail(usize),
}

#[derive(Debug)]
pub struct PhotoGallery {
    photos: Vec<PhotoEntry>,
    comparison: Option<(PhotoEntry, PhotoEntry)>,
    selected: usize,
    view: View,
    item_rects: Vec<Rect>,
    detail_rect: Option<Rect>,
}

impl PhotoGallery {
    /// Build the gallery from `names` resolved against `dir`. With no names,
    /// every image in `dir` is listed in file name order. The comparison pair
    /// is shown only when both files load, and is not repeated in the list.
    pub fn load(dir: Option<&Path>, names: &[String], comparison: Option<&PhotoPair>) -> Self {
        let candidates: Vec<PathBuf> = if names.is_empty() {
            dir.map(scan_dir).unwrap_or_default()
        } else {
            names.iter().map(|n| resolve(dir, n)).collect()
        };
        let pair = comparison.and_then(|pair| {
            let then = PhotoEntry::probe(resolve(dir, &pair.then))?;
            let now = PhotoEntry::probe(resolve(dir, &pair.now))?;
            Some((then, now))
        });
        let photos: Vec<PhotoEntry> = candidates
            .into_iter()
            .filter(|path| {
                pair.as_ref()
                    .is_none_or(|(then, now)| *path != then.path && *path != now.path)
            })
            .filter_map(PhotoEntry::probe)
            .collect();
        tracing::debug!(
            photos = photos.len(),
            comparison = pair.is_some(),
            "photo gallery loaded"
        );
        Self {
            photos,
            comparison: pair,
            selected: 0,
            view: View::List,
            item_rects: Vec::new(),
            detail_rect: None,
        }
    }

    pub fn photos(&self) -> &[PhotoEntry] {
        &self.photos
    }

    pub fn comparison(&self) -> Option<(&PhotoEntry, &PhotoEntry)> {
        self.comparison.as_ref().map(|(a, b)| (a, b))
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty() && self.comparison.is_none()
    }

    pub fn detail(&self) -> Option<&PhotoEntry> {
        match self.view {
            View::Detail(idx) => self.photos.get(idx),
            View::List => None,
        }
    }

    pub fn open(&mut self, idx: usize) -> bool {
        if idx >= self.photos.len() {
            return false;
        }
        self.selected = idx;
        self.view = View::Detail(idx);
        true
    }

    pub fn close_detail(&mut self) -> bool {
        if self.view == View::List {
            return false;
        }
        self.view = View::List;
        true
    }

    fn select_delta(&mut self, delta: isize) -> bool {
        if self.photos.is_empty() {
            return false;
        }
        let len = self.photos.len() as isize;
        self.selected = (self.selected as isize + delta).rem_euclid(len) as usize;
        true
    }

    fn render_list(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        let base = Style::default().bg(theme::panel_bg()).fg(theme::panel_fg());
        let width = area.width as usize;
        let bottom = area.y.saturating_add(area.height);
        let mut y = area.y;
        if let Some((then, now)) = &self.comparison {
            let half = width.saturating_sub(3) / 2;
            let row = format!(
                "{} ↔ {}",
                center_in(&format!("Then: {}", then.name), half),
                center_in(&format!("Now: {}", now.name), half)
            );
            frame.set_string(area.x, y, &row, base.add_modifier(Modifier::BOLD));
            y = y.saturating_add(2);
        }
        for (idx, photo) in self.photos.iter().enumerate() {
            if y >= bottom {
                break;
            }
            let style = if idx == self.selected && ctx.focused() {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
            } else {
                base
            };
            let size = photo.size_label();
            let name_width = width.saturating_sub(size.chars().count() + 3);
            let label = format!("▣ {} {size}", pad_to(&photo.name, name_width));
            frame.set_string(area.x, y, &label, style);
            self.item_rects.push(Rect {
                x: area.x,
                y,
                width: area.width,
                height: 1,
            });
            y = y.saturating_add(1);
        }
    }

    fn render_detail(&mut self, frame: &mut UiFrame<'_>, area: Rect, idx: usize) {
        let Some(photo) = self.photos.get(idx) else {
            return;
        };
        let base = Style::default().bg(theme::dialog_bg()).fg(theme::dialog_fg());
        frame.fill_style(area, base);
        let lines = vec![
            Line::styled(photo.name.clone(), base.add_modifier(Modifier::BOLD)).centered(),
            Line::from(""),
            Line::styled(photo.path.display().to_string(), base).centered(),
            Line::styled(photo.size_label(), base).centered(),
            Line::from(""),
            Line::styled("Enter or click to close", base.add_modifier(Modifier::DIM)).centered(),
        ];
        frame.render_widget(
            Paragraph::new(lines).style(base).wrap(Wrap { trim: true }),
            area,
        );
        self.detail_rect = Some(area);
    }
}

impl Component for PhotoGallery {
    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.item_rects.clear();
        self.detail_rect = None;
        if self.is_empty() {
            let style = Style::default()
                .bg(theme::panel_bg())
                .fg(theme::panel_fg())
                .add_modifier(Modifier::ITALIC);
            frame.render_widget(
                Paragraph::new(EMPTY_MESSAGE)
                    .style(style)
                    .centered()
                    .wrap(Wrap { trim: true }),
                area,
            );
            return;
        }
        match self.view {
            View::List => self.render_list(frame, area, ctx),
            View::Detail(idx) => self.render_detail(frame, area, idx),
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match (self.view, key.code) {
                (View::List, KeyCode::Up) => self.select_delta(-1),
                (View::List, KeyCode::Down) => self.select_delta(1),
                (View::List, KeyCode::Enter) => self.open(self.selected),
                (View::Detail(_), KeyCode::Enter | KeyCode::Backspace) => self.close_detail(),
                _ => false,
            },
            Event::Mouse(mouse)
                if matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) =>
            {
                if self
                    .detail_rect
                    .is_some_and(|r| rect_contains(r, mouse.column, mouse.row))
                {
                    return self.close_detail();
                }
                match self
                    .item_rects
                    .iter()
                    .position(|r| rect_contains(*r, mouse.column, mouse.row))
                {
                    Some(idx) => self.open(idx),
                    None => false,
                }
            }
            _ => false,
        }
    }
}

impl PanelContent for PhotoGallery {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: usize) {
        fs::write(dir.path().join(name), vec![0u8; bytes]).expect("write photo");
    }

    fn names(gallery: &PhotoGallery) -> Vec<&str> {
        gallery.photos().iter().map(|p| p.name.as_str()).collect()
    }

    #[test]
    fn scans_directory_for_images_in_name_order() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "b.png", 10);
        write(&dir, "a.JPG", 10);
        write(&dir, "notes.txt", 10);
        let gallery = PhotoGallery::load(Some(dir.path()), &[], None);
        assert_eq!(names(&gallery), vec!["a.JPG", "b.png"]);
    }

    #[test]
    fn missing_named_photos_are_hidden() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "kept.png", 2048);
        fs::create_dir(dir.path().join("folder.png")).expect("mkdir");
        let wanted = vec![
            "kept.png".to_string(),
            "gone.png".to_string(),
            "folder.png".to_string(),
        ];
        let gallery = PhotoGallery::load(Some(dir.path()), &wanted, None);
        assert_eq!(names(&gallery), vec!["kept.png"]);
        assert_eq!(gallery.photos()[0].size_label(), "2 KB");
    }

    #[test]
    fn comparison_needs_both_files_and_is_not_listed_twice() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "then.png", 1);
        write(&dir, "now.png", 1);
        write(&dir, "trip.png", 1);
        let pair = PhotoPair {
            then: "then.png".to_string(),
            now: "now.png".to_string(),
        };
        let gallery = PhotoGallery::load(Some(dir.path()), &[], Some(&pair));
        assert!(gallery.comparison().is_some());
        assert_eq!(names(&gallery), vec!["trip.png"]);

        let broken = PhotoPair {
            then: "then.png".to_string(),
            now: "lost.png".to_string(),
        };
        let gallery = PhotoGallery::load(Some(dir.path()), &[], Some(&broken));
        assert!(gallery.comparison().is_none());
        assert_eq!(names(&gallery), vec!["now.png", "then.png", "trip.png"]);
    }

    #[test]
    fn no_directory_means_empty_gallery() {
        let gallery = PhotoGallery::load(None, &[], None);
        assert!(gallery.is_empty());
    }

    #[test]
    fn detail_view_opens_and_closes() {
        let dir = TempDir::new().expect("tempdir");
        write(&dir, "one.png", 1);
        let mut gallery = PhotoGallery::load(Some(dir.path()), &[], None);
        assert!(gallery.open(0));
        assert_eq!(gallery.detail().map(|p| p.name.as_str()), Some("one.png"));
        assert!(gallery.close_detail());
        assert!(gallery.detail().is_none());
        assert!(!gallery.open(5));
    }
}
