use std::path::Path;

use tracing::{debug, info};

use super::{BadgeVariant, ResourceManager, actions_column, badge, next_id, text_of, today};
use crate::datatable::{Column, Record};
use crate::domain::{CMSError, Toast};
use crate::form::{Form, FormField, FormSpec};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "svg", "bmp"];
const PLACEHOLDER_IMAGE_URL: &str = "https://images.unsplash.com/photo-1526374965328-7f61d4dc18c5";
const TABS: &[&str] = &["All", "Images", "Documents"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Document,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Document => "document",
        }
    }

    pub fn from_file_name(name: &str) -> Self {
        let is_image = Path::new(name)
            .extension()
            .and_then(|s| s.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
            .unwrap_or(false);
        if is_image {
            MediaKind::Image
        } else {
            MediaKind::Document
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaFile {
    pub id: u64,
    pub name: String,
    pub kind: MediaKind,
    pub size: String,
    pub dimensions: String,
    pub uploaded_at: String,
    pub url: String,
}

impl MediaFile {
    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("type", self.kind.as_str())
            .with("size", self.size.as_str())
            .with("dimensions", self.dimensions.as_str())
            .with("uploadedAt", self.uploaded_at.as_str())
    }
}

const MOCK_MEDIA: [(u64, &str, MediaKind, &str, &str, &str, &str); 6] = [
    (
        1,
        "hero-image.jpg",
        MediaKind::Image,
        "2.4 MB",
        "1920x1080",
        "2025-05-10",
        "https://images.unsplash.com/photo-1581091226825-a6a2a5aee158",
    ),
    (
        2,
        "about-team.jpg",
        MediaKind::Image,
        "1.8 MB",
        "1600x900",
        "2025-05-09",
        "https://images.unsplash.com/photo-1605810230434-7631ac76ec81",
    ),
    (
        3,
        "product-catalog.pdf",
        MediaKind::Document,
        "5.2 MB",
        "",
        "2025-05-08",
        "",
    ),
    (
        4,
        "company-logo.png",
        MediaKind::Image,
        "0.4 MB",
        "400x400",
        "2025-05-07",
        "https://images.unsplash.com/photo-1487058792275-0ad4aaf24ca7",
    ),
    (
        5,
        "services-banner.jpg",
        MediaKind::Image,
        "1.2 MB",
        "1600x600",
        "2025-05-06",
        "https://images.unsplash.com/photo-1488590528505-98d2b5aba04b",
    ),
    (
        6,
        "presentation.pdf",
        MediaKind::Document,
        "8.1 MB",
        "",
        "2025-05-05",
        "",
    ),
];

pub struct MediaLibrary {
    files: Vec<MediaFile>,
    tab: usize,
}

impl Default for MediaLibrary {
    fn default() -> Self {
        let files = MOCK_MEDIA
            .iter()
            .map(|&(id, name, kind, size, dimensions, uploaded_at, url)| MediaFile {
                id,
                name: name.to_string(),
                kind,
                size: size.to_string(),
                dimensions: dimensions.to_string(),
                uploaded_at: uploaded_at.to_string(),
                url: url.to_string(),
            })
            .collect();
        Self::with_files(files)
    }
}

impl MediaLibrary {
    pub fn with_files(files: Vec<MediaFile>) -> Self {
        Self { files, tab: 0 }
    }

    pub fn files(&self) -> &[MediaFile] {
        &self.files
    }

    fn tab_kind(&self) -> Option<MediaKind> {
        match self.tab {
            1 => Some(MediaKind::Image),
            2 => Some(MediaKind::Document),
            _ => None,
        }
    }
}

impl ResourceManager for MediaLibrary {
    fn title(&self) -> &'static str {
        "Media Library"
    }

    fn description(&self) -> &'static str {
        "Upload and manage your media files."
    }

    fn action_label(&self) -> &'static str {
        "Upload File"
    }

    fn columns(&self) -> Vec<Column> {
        vec![
            Column::new("Name", "name"),
            Column::new("Type", "type").with_cell(|v| {
                let variant = match text_of(v) {
                    "image" => BadgeVariant::Default,
                    _ => BadgeVariant::Outline,
                };
                badge(text_of(v), variant)
            }),
            Column::new("Size", "size"),
            Column::new("Dimensions", "dimensions"),
            Column::new("Uploaded", "uploadedAt"),
            actions_column(),
        ]
    }

    /// Only the files of the active type tab.
    fn records(&self) -> Vec<Record> {
        let kind = self.tab_kind();
        self.files
            .iter()
            .filter(|f| kind.is_none_or(|k| f.kind == k))
            .map(MediaFile::to_record)
            .collect()
    }

    fn len(&self) -> usize {
        self.files.len()
    }

    fn form(&self) -> FormSpec {
        FormSpec {
            title: "Upload File",
            description: "Upload a new file to your media library.",
            submit_label: "Upload",
            fields: vec![
                FormField::text("name", "File name", "hero-image.jpg")
                    .with_hint("Images are detected by their extension."),
            ],
        }
    }

    fn create(&mut self, form: &Form) -> Result<Toast, CMSError> {
        let name = form.text("name").trim();
        if name.is_empty() {
            return Err(CMSError::Validation(
                "Please select a file to upload.".to_string(),
            ));
        }
        let kind = MediaKind::from_file_name(name);
        debug!("Detected {} as {:?}", name, kind);
        let file = MediaFile {
            id: next_id(self.files.iter().map(|f| f.id)),
            name: name.to_string(),
            kind,
            size: "1.0 MB".to_string(),
            dimensions: match kind {
                MediaKind::Image => "1920x1080".to_string(),
                MediaKind::Document => String::new(),
            },
            uploaded_at: today(),
            url: match kind {
                MediaKind::Image => PLACEHOLDER_IMAGE_URL.to_string(),
                MediaKind::Document => String::new(),
            },
        };
        info!("Uploaded media file {} \"{}\"", file.id, file.name);
        let toast = Toast::info(
            "File Uploaded",
            format!("{} has been uploaded successfully.", file.name),
        );
        self.files.push(file);
        Ok(toast)
    }

    fn delete(&mut self, id: u64) -> Result<Toast, CMSError> {
        let idx = self
            .files
            .iter()
            .position(|f| f.id == id)
            .ok_or(CMSError::RecordNotFound(id))?;
        let file = self.files.remove(idx);
        info!("Deleted media file {} \"{}\"", file.id, file.name);
        Ok(Toast::info(
            "File Deleted",
            "The file has been deleted successfully.",
        ))
    }

    fn tabs(&self) -> &'static [&'static str] {
        TABS
    }

    fn active_tab(&self) -> usize {
        self.tab
    }

    fn select_tab(&mut self, idx: usize) {
        self.tab = idx % TABS.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(library: &mut MediaLibrary, name: &str) -> Result<Toast, CMSError> {
        let mut form = Form::new(library.form());
        form.set_text("name", name);
        library.create(&form)
    }

    #[test]
    fn kind_follows_extension() {
        assert_eq!(MediaKind::from_file_name("a.PNG"), MediaKind::Image);
        assert_eq!(MediaKind::from_file_name("b.pdf"), MediaKind::Document);
        assert_eq!(MediaKind::from_file_name("noext"), MediaKind::Document);
    }

    #[test]
    fn upload_fills_defaults() {
        let mut library = MediaLibrary::default();
        let toast = upload(&mut library, "banner.jpg").unwrap();
        assert_eq!(toast.title, "File Uploaded");
        let file = library.files().last().unwrap();
        assert_eq!(file.id, 7);
        assert_eq!(file.size, "1.0 MB");
        assert_eq!(file.dimensions, "1920x1080");
        assert_eq!(file.url, PLACEHOLDER_IMAGE_URL);

        upload(&mut library, "notes.txt").unwrap();
        let file = library.files().last().unwrap();
        assert_eq!(file.kind, MediaKind::Document);
        assert!(file.dimensions.is_empty());
    }

    #[test]
    fn upload_without_name_is_rejected() {
        let mut library = MediaLibrary::default();
        match upload(&mut library, "  ") {
            Err(CMSError::Validation(msg)) => assert_eq!(msg, "Please select a file to upload."),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(library.len(), 6);
    }

    #[test]
    fn tabs_narrow_records() {
        let mut library = MediaLibrary::default();
        assert_eq!(library.records().len(), 6);
        library.select_tab(1);
        assert_eq!(library.records().len(), 4);
        library.select_tab(2);
        assert_eq!(library.records().len(), 2);
        library.select_tab(3);
        assert_eq!(library.active_tab(), 0);
    }
}
