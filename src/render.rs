use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// A named template with its data and status. Template rendering itself is
/// out of this service's hands; the view is emitted as a JSON envelope.
#[derive(Debug)]
pub struct View {
    pub name: &'static str,
    pub status: StatusCode,
    pub data: serde_json::Value,
}

impl View {
    pub fn new(name: &'static str, data: impl Serialize) -> Self {
        Self::with_status(StatusCode::OK, name, data)
    }

    pub fn with_status(status: StatusCode, name: &'static str, data: impl Serialize) -> Self {
        let data = serde_json::to_value(data).unwrap_or_else(|e| {
            tracing::error!(view = name, error = %e, "view data not serializable");
            serde_json::Value::Null
        });
        Self { name, status, data }
    }
}

impl IntoResponse for View {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "view": self.name, "data": self.data });
        (self.status, Json(body)).into_response()
    }
}

/// `302 Found` pointing at `location`.
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Representation {
    Html,
    JavaScript,
}

impl Representation {
    fn accepts(&self, media_range: &str) -> bool {
        match self {
            Representation::Html => matches!(media_range, "text/html" | "*/*" | "text/*"),
            Representation::JavaScript => {
                matches!(media_range, "text/javascript" | "application/javascript")
            }
        }
    }
}

/// Media ranges from an `Accept` header, in the order the client sent
/// them. Parameters such as `q` are dropped.
fn media_ranges(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|part| part.split(';').next())
        .map(|range| range.trim().to_ascii_lowercase())
        .filter(|range| !range.is_empty())
        .collect()
}

/// Picks a render closure by the client's `Accept` header.
///
/// The first media range the client lists that any registered
/// representation accepts wins. A request without `Accept` is served as
/// HTML; one that accepts nothing registered gets `406`.
pub struct Responder<'a> {
    wants: Vec<(Representation, Box<dyn FnOnce() -> Response + Send + 'a>)>,
}

impl<'a> Responder<'a> {
    pub fn new() -> Self {
        Self { wants: Vec::new() }
    }

    pub fn wants(
        mut self,
        representation: Representation,
        render: impl FnOnce() -> Response + Send + 'a,
    ) -> Self {
        self.wants.push((representation, Box::new(render)));
        self
    }

    pub fn select(headers: &HeaderMap, offered: &[Representation]) -> Option<Representation> {
        let ranges = media_ranges(headers);
        if ranges.is_empty() {
            return offered.iter().copied().find(|r| *r == Representation::Html);
        }

        ranges
            .iter()
            .find_map(|range| offered.iter().copied().find(|r| r.accepts(range)))
    }

    pub fn respond(self, headers: &HeaderMap) -> Response {
        let offered: Vec<Representation> = self.wants.iter().map(|(r, _)| *r).collect();

        let Some(chosen) = Self::select(headers, &offered) else {
            return (StatusCode::NOT_ACCEPTABLE, "no acceptable representation").into_response();
        };

        match self.wants.into_iter().find(|(r, _)| *r == chosen) {
            Some((_, render)) => render(),
            None => StatusCode::NOT_ACCEPTABLE.into_response(),
        }
    }
}

impl Default for Responder<'_> {
    fn default() -> Self {
        Self::new()
    }
}
