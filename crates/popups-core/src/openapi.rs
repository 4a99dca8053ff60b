//! Combining the per-crate OpenAPI documents into the served schema

use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder};

/// Build a single document titled `title` out of every crate's schema.
///
/// Paths, components and tags are merged in order; when two documents
/// declare the same path the later one wins.
pub fn combine_api_docs(title: &str, version: &str, docs: Vec<OpenApi>) -> OpenApi {
    let mut combined = OpenApiBuilder::new()
        .info(InfoBuilder::new().title(title).version(version).build())
        .paths(PathsBuilder::new().build())
        .build();

    for doc in docs {
        combined.merge(doc);
    }

    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::{path::OperationBuilder, HttpMethod, PathItem};

    fn doc_with_path(path: &str) -> OpenApi {
        OpenApiBuilder::new()
            .info(InfoBuilder::new().title("part").version("0.0.0").build())
            .paths(
                PathsBuilder::new()
                    .path(
                        path,
                        PathItem::new(HttpMethod::Get, OperationBuilder::new().build()),
                    )
                    .build(),
            )
            .build()
    }

    #[test]
    fn test_combine_keeps_title_and_all_paths() {
        let combined = combine_api_docs(
            "Popups API",
            "1.0.0",
            vec![doc_with_path("/popups"), doc_with_path("/analytics/top")],
        );

        assert_eq!(combined.info.title, "Popups API");
        assert!(combined.paths.paths.contains_key("/popups"));
        assert!(combined.paths.paths.contains_key("/analytics/top"));
    }

    #[test]
    fn test_combine_empty() {
        let combined = combine_api_docs("Popups API", "1.0.0", vec![]);
        assert!(combined.paths.paths.is_empty());
    }
}
