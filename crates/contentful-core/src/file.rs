//! File reference value types and Images API options.

use serde::{Serialize, Serializer};
use serde_json::json;

use crate::api::Link;
use crate::api::http::serialize_query;

/// A file already processed and served by the CDN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    file_name: String,
    content_type: String,
    url: String,
    size: u64,
}

impl File {
    /// Create a file reference.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        url: impl Into<String>,
        size: u64,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            url: url.into(),
            size,
        }
    }

    /// The name of this file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The Content- (or MIME-)Type of this file.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The URL where this file can be retrieved.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The size in bytes of this file.
    pub fn size(&self) -> u64 {
        self.size
    }
}

impl Serialize for File {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "fileName": self.file_name,
            "contentType": self.content_type,
            "details": {"size": self.size},
            "url": self.url,
        })
        .serialize(serializer)
    }
}

/// An image file, with dimensions and Images API support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    file_name: String,
    content_type: String,
    url: String,
    size: u64,
    width: u32,
    height: u32,
}

impl ImageFile {
    /// Create an image file reference.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        url: impl Into<String>,
        size: u64,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            url: url.into(),
            size,
            width,
            height,
        }
    }

    /// The name of this file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The Content- (or MIME-)Type of this file.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The size in bytes of this file.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The width of the image, in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the image, in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The URL of this image, optionally transformed by Images API
    /// options.
    pub fn url(&self, options: Option<&ImageOptions>) -> String {
        match options {
            Some(options) => format!("{}?{}", self.url, options.query_string()),
            None => self.url.clone(),
        }
    }
}

impl Serialize for ImageFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "fileName": self.file_name,
            "contentType": self.content_type,
            "details": {
                "size": self.size,
                "image": {"width": self.width, "height": self.height},
            },
            "url": self.url,
        })
        .serialize(serializer)
    }
}

/// A file to be uploaded from a publicly accessible URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteUploadFile {
    file_name: String,
    content_type: String,
    upload: String,
}

impl RemoteUploadFile {
    /// Create an upload reference for the given source URL.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        upload: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            upload: upload.into(),
        }
    }

    /// The name of this file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The Content- (or MIME-)Type of this file.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The URL the file will be uploaded from.
    pub fn upload(&self) -> &str {
        &self.upload
    }
}

impl Serialize for RemoteUploadFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "fileName": self.file_name,
            "contentType": self.content_type,
            "upload": self.upload,
        })
        .serialize(serializer)
    }
}

/// A file to be uploaded from an already-created upload resource.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalUploadFile {
    file_name: String,
    content_type: String,
    upload_from: Link,
}

impl LocalUploadFile {
    /// Create an upload reference pointing at an upload resource.
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        upload_from: Link,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            upload_from,
        }
    }

    /// The name of this file.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The Content- (or MIME-)Type of this file.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// The link to the upload resource.
    pub fn upload_from(&self) -> &Link {
        &self.upload_from
    }
}

impl Serialize for LocalUploadFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        json!({
            "fileName": self.file_name,
            "contentType": self.content_type,
            "uploadFrom": self.upload_from,
        })
        .serialize(serializer)
    }
}

/// Output formats of the Images API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpg,
    Webp,
}

impl ImageFormat {
    fn as_str(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpg => "jpg",
            ImageFormat::Webp => "webp",
        }
    }
}

/// Resize behaviors of the Images API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFit {
    Pad,
    Crop,
    Fill,
    Thumb,
    Scale,
}

impl ResizeFit {
    fn as_str(&self) -> &'static str {
        match self {
            ResizeFit::Pad => "pad",
            ResizeFit::Crop => "crop",
            ResizeFit::Fill => "fill",
            ResizeFit::Thumb => "thumb",
            ResizeFit::Scale => "scale",
        }
    }
}

/// Focus areas for thumbnail resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeFocus {
    Top,
    Right,
    Left,
    Bottom,
    TopRight,
    TopLeft,
    BottomRight,
    BottomLeft,
    Face,
    Faces,
}

impl ResizeFocus {
    fn as_str(&self) -> &'static str {
        match self {
            ResizeFocus::Top => "top",
            ResizeFocus::Right => "right",
            ResizeFocus::Left => "left",
            ResizeFocus::Bottom => "bottom",
            ResizeFocus::TopRight => "top_right",
            ResizeFocus::TopLeft => "top_left",
            ResizeFocus::BottomRight => "bottom_right",
            ResizeFocus::BottomLeft => "bottom_left",
            ResizeFocus::Face => "face",
            ResizeFocus::Faces => "faces",
        }
    }
}

/// Extended options for the Images API, to resize images or change their
/// format.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageOptions {
    width: Option<u32>,
    height: Option<u32>,
    format: Option<ImageFormat>,
    quality: Option<u8>,
    progressive: bool,
    resize_fit: Option<ResizeFit>,
    resize_focus: Option<ResizeFocus>,
    radius: Option<f64>,
    background_color: Option<String>,
}

impl ImageOptions {
    /// Create empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of the image, in pixels.
    ///
    /// The image will not be stretched, skewed or enlarged; it is fit
    /// into the bounding box given by width and height.
    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    /// Set the height of the image, in pixels.
    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Set the JPEG compression quality. Forces the output format to
    /// `jpg`.
    ///
    /// # Panics
    ///
    /// Panics when `quality` is outside `1..=100`.
    pub fn quality(mut self, quality: u8) -> Self {
        assert!(
            (1..=100).contains(&quality),
            "quality must be between 1 and 100, {} given",
            quality
        );

        self.quality = Some(quality);
        self
    }

    /// Request progressive JPEG encoding. Forces the output format to
    /// `jpg`.
    pub fn progressive(mut self, progressive: bool) -> Self {
        self.progressive = progressive;
        self
    }

    /// Set the resize behavior.
    pub fn resize_fit(mut self, fit: ResizeFit) -> Self {
        self.resize_fit = Some(fit);
        self
    }

    /// Set the focus area; only meaningful with [`ResizeFit::Thumb`].
    pub fn resize_focus(mut self, focus: ResizeFocus) -> Self {
        self.resize_focus = Some(focus);
        self
    }

    /// Round the image's corners with the given radius, in pixels.
    ///
    /// # Panics
    ///
    /// Panics when `radius` is negative.
    pub fn radius(mut self, radius: f64) -> Self {
        assert!(radius >= 0.0, "radius must not be negative");

        self.radius = Some(radius);
        self
    }

    /// Set the padding background color, as `#rrggbb`; only meaningful
    /// with [`ResizeFit::Pad`].
    ///
    /// # Panics
    ///
    /// Panics when `color` is not a `#rrggbb` hexadecimal value.
    pub fn background_color(mut self, color: &str) -> Self {
        let valid = color.len() == 7
            && color.starts_with('#')
            && color[1..].chars().all(|c| c.is_ascii_hexdigit());
        assert!(valid, "background color must be in #rrggbb form, \"{}\" given", color);

        self.background_color = Some(color.to_string());
        self
    }

    /// The urlencoded query string for these options.
    pub fn query_string(&self) -> String {
        let mut options: Vec<(String, String)> = Vec::new();

        if let Some(width) = self.width {
            options.push(("w".to_string(), width.to_string()));
        }
        if let Some(height) = self.height {
            options.push(("h".to_string(), height.to_string()));
        }

        // Quality and progressive encoding only exist for JPEGs.
        let format = if self.quality.is_some() || self.progressive {
            Some(ImageFormat::Jpg)
        } else {
            self.format
        };
        if let Some(format) = format {
            options.push(("fm".to_string(), format.as_str().to_string()));
        }
        if let Some(quality) = self.quality {
            options.push(("q".to_string(), quality.to_string()));
        }
        if let Some(radius) = self.radius {
            options.push(("r".to_string(), radius.to_string()));
        }
        if self.progressive {
            options.push(("fl".to_string(), "progressive".to_string()));
        }

        if let Some(fit) = self.resize_fit {
            options.push(("fit".to_string(), fit.as_str().to_string()));

            if fit == ResizeFit::Thumb {
                if let Some(focus) = self.resize_focus {
                    options.push(("f".to_string(), focus.as_str().to_string()));
                }
            }
            if fit == ResizeFit::Pad {
                if let Some(color) = &self.background_color {
                    options.push(("bg".to_string(), format!("rgb:{}", &color[1..])));
                }
            }
        }

        serialize_query(options.iter().map(|(n, v)| (n.as_str(), v.as_str())))
    }
}
