//! Document pipeline tests
//!
//! Runs parse → map → mutate → serialize on in-memory documents backed by a
//! temporary source tree, and checks the emitted component against the
//! properties the router and bundler rely on:
//! - tag records follow document pre-order
//! - resolved references become referenced import bindings
//! - relocated style/script bodies never appear as body elements
//! - generated code parses as a JSX module

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    use crate::attributes::parse_tag_records;
    use crate::codegen::{component_name_for, ContentSerializer, GeneratedComponent};
    use crate::props_map::PropsMap;
    use crate::verify::verify_component;

    const FULL_EXAMPLE: &str = r#"<!doctype html>
<html lang="en">

<head>

  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">
  <link rel="stylesheet" href="./static/main.css">
  <title>Reactonite App</title>

</head>

<body>
  <div class="main">
    <header class="main-header">
      <img src="./static/logo.png" class="logo" alt="Reactonite" />
      <p>
        Entry point is <code>src/index.html</code>, save to auto reload.
      </p>
      <a class="link" href="https://github.com/" target="_blank" rel="noopener noreferrer">
        Learn more
      </a>
    </header>
  </div>
  <script src="./static/main.js"></script>
</body>

</html>
"#;

    fn source_tree(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for file in files {
            let path = dir.path().join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "").unwrap();
        }
        dir
    }

    fn transpile(root: &Path, rel: &str, html: &str) -> GeneratedComponent {
        let props = PropsMap::builtin();
        let rel = Path::new(rel);
        let name = component_name_for(rel, rel == Path::new("index.html"));
        let out = ContentSerializer::new(&props, root)
            .serialize(html, rel, &name)
            .unwrap();
        verify_component(rel, &out.code).unwrap();
        out
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // ORDER
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_record_count_matches_start_tags() {
        let records = parse_tag_records(
            "<html><head></head><body><ul><li>a</li><li>b<br></li></ul><p>c</p></body></html>",
        );
        let names: Vec<&str> = records.iter().map(|r| r.tag_name.as_str()).collect();
        assert_eq!(
            names,
            vec!["html", "head", "body", "ul", "li", "li", "br", "p"]
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SCENARIOS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_heading_and_local_image() {
        let dir = source_tree(&["logo.png"]);
        let out = transpile(dir.path(), "index.html", r#"<h1>Hi</h1><img src="logo.png">"#);

        assert_eq!(
            out.code,
            "import React from 'react';\n\
             import logo_png from './logo.png';\n\
             \n\
             function App() {\n  return (\n    <><h1>Hi</h1><img src={logo_png}/></>\n  );\n}\n\
             \n\
             export default App;\n"
        );
        assert_eq!(out.imports.len(), 1);
    }

    #[test]
    fn test_style_and_class_rename() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            r#"<style>.a{color:red}</style><body><div class="a">x</div></body>"#,
        );

        assert!(out.code.contains("import Helmet from 'react-helmet';"));
        assert!(out.code.contains(
            "<><Helmet><style>{`.a{color:red}`}</style></Helmet><div className=\"a\">x</div></>"
        ));
        assert_eq!(out.code.matches("<style>").count(), 1);
    }

    #[test]
    fn test_full_document() {
        let dir = source_tree(&["static/main.css", "static/logo.png", "static/main.js"]);
        let out = transpile(dir.path(), "index.html", FULL_EXAMPLE);

        let imports: Vec<&str> = out
            .code
            .lines()
            .take_while(|line| line.starts_with("import"))
            .collect();
        assert_eq!(
            imports,
            vec![
                "import React from 'react';",
                "import Helmet from 'react-helmet';",
                "import './static/main.css';",
                "import __static_logo_png from './static/logo.png';",
                "import __static_main_js from './static/main.js';",
            ]
        );

        assert!(out.code.contains(r#"<meta charSet="utf-8"/>"#));
        assert!(out.code.contains("<title>Reactonite App</title>"));
        assert!(!out.code.contains("<link"));
        assert!(out
            .code
            .contains(r#"<img src={__static_logo_png} className="logo" alt="Reactonite"/>"#));
        assert!(out.code.contains(r#"<a className="link" href="https://github.com/""#));
        assert!(out.code.contains("<script src={__static_main_js}></script>"));
        assert!(out.code.contains("<code>src/index.html</code>"));
    }

    #[test]
    fn test_inline_handlers_and_inline_styles_dropped() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            r#"<button onclick="go()" style="color:red" type="button">Go</button>"#,
        );
        assert!(out.code.contains(r#"<button type="button">Go</button>"#));
    }

    #[test]
    fn test_inline_scripts_joined_once() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            "<head><script>window.a = 1;</script></head><body><p>x</p><script>console.log(window.a);</script></body>",
        );

        assert!(out.code.starts_with("import React, { useEffect } from 'react';\n"));
        assert_eq!(out.code.matches("useEffect(() =>").count(), 1);
        assert!(out
            .code
            .contains("useEffect(() => {\nwindow.a = 1;\nconsole.log(window.a);\n  }, []);"));
        assert_eq!(out.code.matches("window.a = 1;").count(), 1);
        assert!(!out.code.contains("<script"));
        assert!(!out.has_metadata);
    }

    #[test]
    fn test_only_javascript_scripts_run_in_effect() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            r#"<head>
<script type="application/ld+json">{"@context": "https://schema.org", "@type": "WebSite"}</script>
<script type="importmap">{"imports": {"x": "./x.js"}}</script>
<script type="text/template"><li>{{ name }}</li></script>
</head>
<body>
<script type="module">import x from 'x'; x();</script>
<script type="text/JavaScript; charset=utf-8">window.a = 1;</script>
<script type="">window.b = 2;</script>
<p>x</p>
</body>"#,
        );

        assert_eq!(out.inline_scripts, 2);
        assert!(out.code.contains("useEffect(() => {\nwindow.a = 1;\nwindow.b = 2;\n  }, []);"));
        assert!(!out.code.contains("@context"));
        assert!(!out.code.contains("imports"));
        assert!(!out.code.contains("{{ name }}"));
        assert!(!out.code.contains("import x from"));
        assert!(!out.code.contains("<script"));
        assert!(!out.has_metadata);
    }

    #[test]
    fn test_anchor_rewrite_from_nested_page() {
        let dir = source_tree(&["index.html", "blog/index.html", "blog/post.html", "docs/guide.pdf"]);
        let out = transpile(
            dir.path(),
            "blog/post.html",
            r##"<nav><a href="../index.html">Home</a><a href="./">Blog</a><a href="post.html#c">Self</a><a href="../docs/guide.pdf">PDF</a><a href="#top">Top</a></nav>"##,
        );

        assert!(out.code.contains("import { Link } from 'react-router-dom';"));
        assert!(out.code.contains(r#"<Link to="/">Home</Link>"#));
        assert!(out.code.contains(r#"<Link to="/blog">Blog</Link>"#));
        assert!(out.code.contains(r#"<Link to="/blog/post#c">Self</Link>"#));
        assert!(out.code.contains(r#"<a href="../docs/guide.pdf">PDF</a>"#));
        assert!(out.code.contains(r##"<a href="#top">Top</a>"##));
        assert_eq!(out.code.matches("import { Link }").count(), 1);
        assert_eq!(out.component_name, "Post");
    }

    #[test]
    fn test_missing_reference_unchanged() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            r#"<img src="missing.png"><link rel="stylesheet" href="missing.css">"#,
        );
        assert!(out.code.contains(r#"<img src="missing.png"/>"#));
        assert!(out.imports.is_empty());
        assert!(!out.code.contains("missing.css"));
    }

    #[test]
    fn test_identical_placeholder_text_only_unquoted_for_bound_imports() {
        let dir = source_tree(&["logo.png"]);
        let out = transpile(
            dir.path(),
            "index.html",
            r#"<img src="logo.png"><span title="{logo_png}">t</span><p data-x="{other}">y</p>"#,
        );
        assert!(out.code.contains("<img src={logo_png}/>"));
        assert!(out.code.contains(r#"<span title="{logo_png}">t</span>"#));
        assert!(out.code.contains(r#"data-x="{other}""#));
    }

    #[test]
    fn test_svg_attributes() {
        let dir = source_tree(&[]);
        let out = transpile(
            dir.path(),
            "index.html",
            r##"<svg viewBox="0 0 10 10"><path stroke-width="2" fill-opacity="0.5" d="M0 0"/><use xlink:href="#i"/></svg>"##,
        );
        assert!(out.code.contains(r#"viewBox="0 0 10 10""#));
        assert!(out.code.contains(r#"strokeWidth="2""#));
        assert!(out.code.contains(r#"fillOpacity="0.5""#));
        assert!(out.code.contains(r##"xlinkHref="#i""##));
    }

    #[test]
    fn test_malformed_markup_still_produces_component() {
        let dir = source_tree(&[]);
        let out = transpile(dir.path(), "index.html", "<div><p>unclosed <b>bold</div><img src=");
        assert!(out.code.contains("<div><p>unclosed <b>bold</b></p>"));
    }

    #[test]
    fn test_idempotent() {
        let dir = source_tree(&["static/main.css", "static/logo.png", "static/main.js"]);
        let first = transpile(dir.path(), "index.html", FULL_EXAMPLE);
        let second = transpile(dir.path(), "index.html", FULL_EXAMPLE);
        assert_eq!(first.code, second.code);
    }
}
