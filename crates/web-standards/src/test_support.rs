/// Fixture data package shared by the unit tests.
use tempfile::TempDir;

use crate::cache::SpecIndex;
use crate::loader::{self, CSS_FILE, ELEMENTS_DIR, IDL_DIR, SPECS_FILE};

pub const SPECS_JSON: &str = r#"[
  {
    "shortname": "fetch",
    "title": "Fetch Standard",
    "url": "https://fetch.spec.whatwg.org/",
    "organization": "WHATWG",
    "nightly": { "url": "https://fetch.spec.whatwg.org/", "status": "Living Standard" },
    "series": { "shortname": "fetch", "currentSpecification": "fetch" },
    "categories": ["browser"],
    "abstract": "The Fetch standard defines requests, responses, and the process that binds them: fetching."
  },
  {
    "shortname": "service-workers-1",
    "title": "Service Workers 1",
    "url": "https://www.w3.org/TR/service-workers-1/",
    "organization": "W3C",
    "release": { "url": "https://www.w3.org/TR/service-workers-1/", "status": "Candidate Recommendation Draft" },
    "series": { "shortname": "service-workers", "currentSpecification": "service-workers-2" },
    "categories": ["browser"]
  },
  {
    "shortname": "service-workers-2",
    "title": "Service Workers Nightly",
    "url": "https://w3c.github.io/ServiceWorker/",
    "organization": "W3C",
    "nightly": { "url": "https://w3c.github.io/ServiceWorker/", "status": "Editor's Draft" },
    "series": { "shortname": "service-workers", "currentSpecification": "service-workers-2" },
    "categories": ["browser"]
  },
  {
    "shortname": "appmanifest",
    "title": "Web Application Manifest",
    "url": "https://www.w3.org/TR/appmanifest/",
    "organization": "W3C",
    "release": { "status": "Working Draft" },
    "series": { "shortname": "appmanifest" },
    "categories": ["browser"]
  },
  {
    "shortname": "push-api",
    "title": "Push API",
    "url": "https://www.w3.org/TR/push-api/",
    "organization": "W3C",
    "categories": ["browser"]
  },
  {
    "shortname": "notifications",
    "title": "Notifications API Standard",
    "url": "https://notifications.spec.whatwg.org/",
    "organization": "WHATWG",
    "categories": ["browser"]
  },
  {
    "shortname": "css-flexbox-1",
    "title": "CSS Flexible Box Layout Module Level 1",
    "url": "https://www.w3.org/TR/css-flexbox-1/",
    "organization": "W3C",
    "series": { "shortname": "css-flexbox" },
    "categories": ["browser"],
    "abstract": "The specification describes a CSS box model optimized for user interface design."
  },
  {
    "shortname": "html",
    "title": "HTML Standard",
    "url": "https://html.spec.whatwg.org/multipage/",
    "organization": "WHATWG",
    "categories": ["browser"],
    "abstract": "HTML is the core markup language of the Web."
  },
  {
    "shortname": "webgpu",
    "title": "WebGPU",
    "url": "https://www.w3.org/TR/webgpu/",
    "organization": "W3C",
    "abstract": "WebGPU exposes an API for performing operations, such as rendering and computation, on a Graphics Processing Unit."
  },
  {
    "shortname": "dom",
    "title": "DOM Standard",
    "url": "https://dom.spec.whatwg.org/",
    "organization": "WHATWG",
    "categories": ["browser"]
  },
  {
    "shortname": "ecmascript",
    "title": "ECMAScript Language Specification",
    "url": "https://tc39.es/ecma262/",
    "organization": "Ecma International"
  }
]"#;

const CSS_JSON: &str = r#"{
  "properties": [
    { "name": "flex-direction", "href": "https://drafts.csswg.org/css-flexbox-1/#propdef-flex-direction",
      "value": "row | row-reverse | column | column-reverse", "initial": "row", "inherited": "no",
      "appliesTo": "flex containers" },
    { "name": "display", "href": "https://drafts.csswg.org/css-display-3/#propdef-display",
      "value": "[ <display-outside> || <display-inside> ] | <display-listitem>", "initial": "inline", "inherited": "no" },
    { "name": "color", "href": "https://drafts.csswg.org/css-color-4/#propdef-color",
      "value": "<color>", "initial": "CanvasText", "inherited": "yes" },
    { "name": "align-items", "href": "https://drafts.csswg.org/css-align-3/#propdef-align-items",
      "value": "normal | stretch | <baseline-position>", "initial": "normal", "inherited": "no" },
    { "name": "mystery", "href": "not-a-url" }
  ],
  "atrules": [
    { "name": "@media", "href": "https://drafts.csswg.org/mediaqueries-5/#at-ruledef-media" },
    { "name": "@font-face", "href": "https://drafts.csswg.org/css-fonts-4/#at-font-face-rule" }
  ],
  "selectors": [
    { "name": ":hover", "href": "https://drafts.csswg.org/selectors-4/#hover-pseudo" }
  ],
  "values": [
    { "name": "<color>", "href": "https://drafts.csswg.org/css-color-4/#typedef-color", "type": "type" }
  ]
}"#;

const HTML_ELEMENTS_JSON: &str = r#"{
  "spec": { "title": "HTML Standard", "url": "https://html.spec.whatwg.org/multipage/" },
  "elements": [
    { "name": "video", "interface": "HTMLVideoElement", "href": "https://html.spec.whatwg.org/multipage/media.html#the-video-element" },
    { "name": "audio", "interface": "HTMLAudioElement", "href": "https://html.spec.whatwg.org/multipage/media.html#the-audio-element" },
    { "name": "div", "interface": "HTMLDivElement" }
  ]
}"#;

const SVG_ELEMENTS_JSON: &str = r#"{
  "elements": [
    { "name": "svg", "interface": "SVGSVGElement" },
    { "name": "a", "interface": "SVGAElement" }
  ]
}"#;

const IDL_FILES: &[(&str, &str)] = &[
    ("fetch", "[Exposed=(Window,Worker)]\ninterface Request {};\n"),
    ("service-workers", "[SecureContext, Exposed=(Window,Worker)]\ninterface ServiceWorker : EventTarget {};\n"),
    ("webgpu", "interface GPU {};\n"),
    ("css-fonts", "interface CSSFontFaceRule : CSSRule {};\n"),
    ("css-typed-om", "interface CSSStyleValue {};\n"),
];

pub fn fixture_index() -> SpecIndex {
    SpecIndex::new(loader::parse_specifications(SPECS_JSON).expect("fixture specs parse"))
}

/// Writes the full fixture package into a fresh temporary directory.
pub fn write_fixture_bundle() -> TempDir {
    let dir = tempfile::tempdir().expect("create temp dir");
    let root = dir.path();

    std::fs::write(root.join(SPECS_FILE), SPECS_JSON).expect("write specs");
    std::fs::write(root.join(CSS_FILE), CSS_JSON).expect("write css");

    std::fs::create_dir(root.join(IDL_DIR)).expect("create idl dir");
    for (shortname, idl) in IDL_FILES {
        std::fs::write(root.join(IDL_DIR).join(format!("{shortname}.idl")), idl)
            .expect("write idl");
    }

    std::fs::create_dir(root.join(ELEMENTS_DIR)).expect("create elements dir");
    std::fs::write(root.join(ELEMENTS_DIR).join("html.json"), HTML_ELEMENTS_JSON)
        .expect("write html elements");
    std::fs::write(root.join(ELEMENTS_DIR).join("svg.json"), SVG_ELEMENTS_JSON)
        .expect("write svg elements");

    dir
}
