//! Wire-format types for the gallery REST endpoint
//!
//! These types match EXACTLY what the REST endpoint returns.
//! DO NOT add fields that aren't in the response documents.
//! DO NOT use these types outside the gallery module - convert to domain types.
//!
//! Every response is an XML document wrapped in a `<rsp stat="...">` envelope.
//! On failure the envelope carries an `<err code="..." msg="..."/>` child;
//! some deployments put `code`/`message` attributes on `<rsp>` itself, so the
//! parser accepts both placements (the `<err>` element wins).
//!
//! Repeated elements (`<Album>`, `<Image>`) are always collected into a `Vec`,
//! whether the document contains zero, one, or many of them. Callers never see
//! a scalar-vs-list distinction.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::domain::GalleryError;

/// A parsed response envelope
#[derive(Debug, Default)]
pub struct RestResponse {
    /// Top-level status attribute (`ok` on success)
    pub stat: String,
    /// Error detail, present on failure responses
    pub error: Option<ErrorDto>,
    /// Session issued by the login methods
    pub session_id: Option<String>,
    /// Albums from `albums.get`, zero or more
    pub albums: Vec<AlbumDto>,
    /// Images from `images.get`, zero or more
    pub images: Vec<ImageDto>,
}

/// Error detail from a `stat="fail"` response
#[derive(Debug, Default, Clone)]
pub struct ErrorDto {
    pub code: u32,
    pub message: String,
}

/// One `<Album>` element
#[derive(Debug, Default, Clone)]
pub struct AlbumDto {
    pub id: Option<u64>,
    pub key: Option<String>,
    pub title: Option<String>,
}

/// One `<Image>` element from a heavy listing
#[derive(Debug, Default, Clone)]
pub struct ImageDto {
    pub id: Option<u64>,
    /// Download URL for the large rendition; only present on heavy listings
    pub large_url: Option<String>,
}

impl RestResponse {
    /// Whether the envelope reports success
    pub fn is_ok(&self) -> bool {
        self.stat == "ok"
    }

    /// Error code and message for a failure envelope.
    ///
    /// Falls back to zero / the raw stat value when the response carried no
    /// error detail at all.
    pub fn error_parts(&self) -> (u32, String) {
        match &self.error {
            Some(err) => (err.code, err.message.clone()),
            None => (0, format!("stat: {}", self.stat)),
        }
    }

    /// Parse a response document.
    ///
    /// Only the envelope is validated here; whether `stat` is `ok` is the
    /// caller's decision to check before touching any payload field.
    pub fn parse(xml: &str) -> Result<Self, GalleryError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut response = RestResponse::default();

        loop {
            match reader.read_event() {
                Ok(Event::Start(event)) | Ok(Event::Empty(event)) => {
                    collect_element(&mut response, &event)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(GalleryError::Parse(e.to_string())),
                _ => {}
            }
        }

        if response.stat.is_empty() {
            return Err(GalleryError::Parse(
                "response has no <rsp stat=\"...\"> envelope".to_string(),
            ));
        }

        Ok(response)
    }
}

/// Fold one element's attributes into the response being built
fn collect_element(response: &mut RestResponse, event: &BytesStart) -> Result<(), GalleryError> {
    match event.name().as_ref() {
        b"rsp" => {
            // stat plus the flattened error-attribute variant
            let mut code = None;
            let mut message = None;
            for attr in attributes(event)? {
                match attr {
                    (b"stat", value) => response.stat = value,
                    (b"code", value) => code = value.parse().ok(),
                    (b"message", value) => message = Some(value),
                    _ => {}
                }
            }
            if let Some(message) = message {
                response.error = Some(ErrorDto {
                    code: code.unwrap_or(0),
                    message,
                });
            }
        }
        b"err" => {
            let mut error = ErrorDto::default();
            for attr in attributes(event)? {
                match attr {
                    (b"code", value) => error.code = value.parse().unwrap_or(0),
                    (b"msg", value) => error.message = value,
                    _ => {}
                }
            }
            // The <err> element is authoritative over rsp-level attributes
            response.error = Some(error);
        }
        b"Session" => {
            for attr in attributes(event)? {
                if let (b"id", value) = attr {
                    response.session_id = Some(value);
                }
            }
        }
        b"Album" => {
            let mut album = AlbumDto::default();
            for attr in attributes(event)? {
                match attr {
                    (b"id", value) => album.id = value.parse().ok(),
                    (b"Key", value) => album.key = Some(value),
                    (b"Title", value) => album.title = Some(value),
                    _ => {}
                }
            }
            response.albums.push(album);
        }
        b"Image" => {
            let mut image = ImageDto::default();
            for attr in attributes(event)? {
                match attr {
                    (b"id", value) => image.id = value.parse().ok(),
                    (b"LargeURL", value) => image.large_url = Some(value),
                    _ => {}
                }
            }
            response.images.push(image);
        }
        _ => {}
    }
    Ok(())
}

/// Decode an element's attributes as (name, unescaped value) pairs
fn attributes<'e>(event: &'e BytesStart<'_>) -> Result<Vec<(&'e [u8], String)>, GalleryError> {
    let mut out = Vec::new();
    for attr in event.attributes() {
        let attr = attr.map_err(|e| GalleryError::Parse(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| GalleryError::Parse(e.to_string()))?
            .into_owned();
        out.push((attr.key.into_inner(), value));
    }
    Ok(out)
}

// ============================================================================
// CONTRACT TESTS
// These verify the parser against documents shaped like the real endpoint's.
// If these fail, the API has changed and the DTOs need updating.
// ============================================================================
