//! HTTP span helpers.

const OBJECT_ID_HEX_LEN: usize = 24;

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    /// Path with document ids collapsed, safe to use as a metric label.
    pub(super) route: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let route = normalise_route(path);
    let otel_span_name = format!("{method} {route}");

    RequestSpanName {
        route,
        otel_span_name,
    }
}

fn normalise_route(path: &str) -> String {
    if path == "/" {
        return "/".to_owned();
    }

    let mut normalised = String::from("/");

    for (index, segment) in path.trim_start_matches('/').split('/').enumerate() {
        if index > 0 {
            normalised.push('/');
        }

        if is_object_id(segment) {
            normalised.push_str("{id}");
        } else {
            normalised.push_str(segment);
        }
    }

    normalised
}

fn is_object_id(segment: &str) -> bool {
    segment.len() == OBJECT_ID_HEX_LEN && segment.bytes().all(|byte| byte.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_id_segments_collapse_to_placeholder() {
        let names = request_span_name("PATCH", "/cart/decrease/65f0c0ffee0000000000beef");

        assert_eq!(names.route, "/cart/decrease/{id}");
        assert_eq!(names.otel_span_name, "PATCH /cart/decrease/{id}");
    }

    #[test]
    fn other_segments_are_kept() {
        assert_eq!(normalise_route("/"), "/");
        assert_eq!(normalise_route("/userOrders"), "/userOrders");
        assert_eq!(normalise_route("/cart/delete/123"), "/cart/delete/123");
    }
}
