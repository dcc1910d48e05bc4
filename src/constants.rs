//! Module for shared constants used across the codebase

/// Placeholder fence and compact token constants
pub mod state {
    /// Delimiter used when the stored one is empty
    pub const DEFAULT_BUCKET: &str = "##";

    /// Marker prefixing a compact state token
    pub const TOKEN_MARKER: &str = "lz:";

    /// Default file name prefix for exported documents
    pub const DEFAULT_EXPORT_PREFIX: &str = "tm_";

    /// Extension of exported documents
    pub const DOCUMENT_EXT: &str = ".json";
}

/// Reserved keys of the node tree
pub mod keys {
    /// Key naming the template of a component node
    pub const COMPONENT: &str = "$";

    /// Top-level marker carrying the globals table
    pub const GLOBALS: &str = "$globals";

    /// Top-level marker carrying the render settings
    pub const SETTINGS: &str = "$settings";
}

/// Defaults and diagnostics of the date/time directives
pub mod time {
    /// Pattern used by `DATE` when `settings.date.format` is absent
    pub const DEFAULT_DATE_FORMAT: &str = "yyyy/MM/dd";

    /// Pattern used by `TIME` when `settings.time.format` is absent
    pub const DEFAULT_TIME_FORMAT: &str = "hh:mm:ss";

    /// Interval used by `TIME` when `settings.time.interval` is absent
    pub const DEFAULT_TIME_INTERVAL: &str = "1s";

    /// chrono format of the time printed when no time settings exist
    pub const LOCALE_TIME_FORMAT: &str = "%X";

    /// Rendered in place of the time when the interval is malformed
    pub const INVALID_INTERVAL: &str = "|settings.time.interval is invalid format|";
}

/// Diagnostics rendered inline by the meta directives
pub mod directive {
    pub const INVALID_DEF: &str = "|DEF is invalid format|";
    pub const INVALID_LINE: &str = "|LINE is invalid format|";

    /// Largest newline count a single `LINE` directive may emit
    pub const MAX_LINE_BREAKS: u64 = 1024;
}

pub mod example {
    /// Tree previewed while the document has no custom content
    pub const DEFAULT_CUSTOM: &str = "- $: text\n  \
                                      id: aaaaa\n  \
                                      body:\n    \
                                      - $: text\n      \
                                      id: bbbbb\n      \
                                      body: |-\n        \
                                      Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n        \
                                      Suspendisse malesuada lacus ex, sit amet blandit leo lobortis eget.\n\
                                      - $: text\n  \
                                      id: \"\"\n  \
                                      body: hello world!\n";

    /// Bundled example project loaded by the `example` command
    pub const EXAMPLE_PROJECT: &str = r###"{
  "bucket": "##",
  "templates": [
    {
      "name": "text",
      "code": "<div id=\"##id##\">##body##</div>"
    },
    {
      "name": "section",
      "code": "##REM:section wrapper##<section>##LINE####DEF:title,Untitled##: ##body####LINE##</section>##LINE##"
    },
    {
      "name": "footer",
      "code": "<footer>##GB:author## - ##DATE##</footer>"
    }
  ],
  "custom": [
    {
      "$globals": {
        "author": "tmaker"
      }
    },
    {
      "$settings": {
        "date": {
          "format": "yyyy-MM-dd"
        },
        "time": {
          "format": "hh:mm",
          "interval": "15m"
        }
      }
    },
    {
      "$": "section",
      "title": "Intro",
      "body": [
        {
          "$": "text",
          "id": "greeting",
          "body": "hello world!"
        },
        {
          "$": "text",
          "id": "lines",
          "body": [
            "first line",
            "second line"
          ]
        }
      ]
    },
    {
      "$": "section",
      "body": "no title given"
    },
    {
      "$": "footer"
    }
  ]
}"###;
}
