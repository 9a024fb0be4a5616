/// Data layer: trace grid types and SEG-Y decoding / encoding.
///
/// Architecture:
/// ```text
///      .sgy file
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  binary header + traces → TraceGrid
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ TraceGrid  │  traces × samples, f64, row-major
///   └───────────┘
///        ▲
///        │
///   ┌──────────┐
///   │  writer   │  TraceGrid → .sgy (synthetic surveys, tests)
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod writer;
