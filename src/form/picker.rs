//! File picker overlay for save fields

use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent};

/// Result of a key press in the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    None,
    /// User picked a file, existing or new
    Selected(PathBuf),
    Cancelled,
}

/// A file or directory entry in the file browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// State for the file picker
#[derive(Debug, Clone)]
pub struct FilePicker {
    pub current_dir: PathBuf,
    pub entries: Vec<FileEntry>,
    pub selected: usize,
    pub search: String,
    pub filtered: Vec<usize>,
}

impl FilePicker {
    pub fn new(start_dir: PathBuf) -> Self {
        let entries = list_directory(&start_dir);
        let filtered: Vec<usize> = (0..entries.len()).collect();
        Self {
            current_dir: start_dir,
            entries,
            selected: 0,
            search: String::new(),
            filtered,
        }
    }

    /// Open next to `current` when it names a file in an existing directory,
    /// otherwise in the working directory (or home).
    pub fn for_field(current: &str) -> Self {
        let current = Path::new(current.trim());
        let start_dir = current
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty() && parent.is_dir())
            .map(Path::to_path_buf)
            .or_else(|| std::env::current_dir().ok())
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(start_dir)
    }

    fn refresh(&mut self) {
        self.entries = list_directory(&self.current_dir);
        self.search.clear();
        self.filtered = (0..self.entries.len()).collect();
        self.selected = 0;
    }

    fn navigate_to(&mut self, path: PathBuf) {
        self.current_dir = path;
        self.refresh();
    }

    fn update_filter(&mut self) {
        let search_lower = self.search.to_lowercase();
        self.filtered = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.name.to_lowercase().contains(&search_lower))
            .map(|(i, _)| i)
            .collect();
        self.selected = 0;
    }

    pub fn selected_entry(&self) -> Option<&FileEntry> {
        self.filtered
            .get(self.selected)
            .and_then(|&index| self.entries.get(index))
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> PickerAction {
        match key.code {
            KeyCode::Enter => {
                if let Some(entry) = self.selected_entry().cloned() {
                    if entry.is_dir {
                        self.navigate_to(entry.path);
                    } else {
                        return PickerAction::Selected(entry.path);
                    }
                } else if !self.search.trim().is_empty() {
                    // Nothing matches: the filter is a new file name
                    return PickerAction::Selected(self.current_dir.join(self.search.trim()));
                }
            }
            KeyCode::Backspace => {
                if self.search.is_empty() {
                    if let Some(parent) = self.current_dir.parent() {
                        self.navigate_to(parent.to_path_buf());
                    }
                } else {
                    self.search.pop();
                    self.update_filter();
                }
            }
            KeyCode::Esc => {
                // Only quit if search is empty, otherwise clear search
                if self.search.is_empty() {
                    return PickerAction::Cancelled;
                }
                self.search.clear();
                self.update_filter();
            }
            KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Down => {
                if self.selected + 1 < self.filtered.len() {
                    self.selected += 1;
                }
            }
            KeyCode::PageUp => {
                self.selected = self.selected.saturating_sub(10);
            }
            KeyCode::PageDown => {
                self.selected = (self.selected + 10).min(self.filtered.len().saturating_sub(1));
            }
            KeyCode::Home => {
                self.selected = 0;
            }
            KeyCode::End => {
                self.selected = self.filtered.len().saturating_sub(1);
            }
            KeyCode::Char(c) if !c.is_control() => {
                self.search.push(c);
                self.update_filter();
            }
            _ => {}
        }
        PickerAction::None
    }
}

/// Directories before files, each alphabetical ignoring case, with `..`
/// on top. Hidden entries are skipped and unreadable directories list empty.
fn list_directory(path: &Path) -> Vec<FileEntry> {
    let mut entries: Vec<FileEntry> = std::fs::read_dir(path)
        .map(|read_dir| {
            read_dir
                .flatten()
                .filter_map(|entry| {
                    let name = entry.file_name().to_string_lossy().into_owned();
                    (!name.starts_with('.')).then(|| {
                        let path = entry.path();
                        FileEntry {
                            name,
                            is_dir: path.is_dir(),
                            path,
                        }
                    })
                })
                .collect()
        })
        .unwrap_or_default();
    entries.sort_by_cached_key(|entry| (!entry.is_dir, entry.name.to_lowercase()));

    if let Some(parent) = path.parent().filter(|parent| *parent != path) {
        entries.insert(
            0,
            FileEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
            },
        );
    }

    entries
}
