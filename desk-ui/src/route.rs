use dioxus::prelude::*;

use crate::content::{MainPage, PostDetail, PostList};
use crate::desktop::DesktopShell;

#[derive(Debug, Clone, PartialEq, Routable)]
pub enum Route {
    #[layout(DesktopShell)]
    #[route("/")]
    MainPage {},
    #[route("/post")]
    PostList {},
    #[route("/post/:index")]
    PostDetail { index: usize },
}

/// Parse a server-sent navigation route into a typed route.
///
/// Unknown paths yield `None` and are ignored by the shell.
pub fn route_from_path(path: &str) -> Option<Route> {
    match path {
        "/" => Some(Route::MainPage {}),
        "/post" => Some(Route::PostList {}),
        other => {
            let index = other.strip_prefix("/post/")?.parse().ok()?;
            Some(Route::PostDetail { index })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_from_path_known_routes() {
        assert_eq!(route_from_path("/"), Some(Route::MainPage {}));
        assert_eq!(route_from_path("/post"), Some(Route::PostList {}));
        assert_eq!(
            route_from_path("/post/3"),
            Some(Route::PostDetail { index: 3 })
        );
    }

    #[test]
    fn test_route_from_path_rejects_unknown() {
        assert_eq!(route_from_path("/settings"), None);
        assert_eq!(route_from_path("/post/abc"), None);
        assert_eq!(route_from_path(""), None);
    }
}
