//! Interactive coordinate-plane engine for the graphpaper visualizer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! plane's state and behavior: the Y-up viewport with cursor-anchored zoom,
//! the shape collection (markers, two-point lines, splines, parabolas and
//! function curves), hit-testing, the drag and placement state machine, and
//! the per-frame render pass. The host layer wires DOM events to the engine,
//! draws its side panels, and reacts to the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Shape collection, handle moves and marker constraints |
//! | [`doc`] | Shape types and panel patches |
//! | [`camera`] | World/screen viewport and pan/zoom |
//! | [`geometry`] | Segment projection, Catmull-Rom, quadratics and snapping |
//! | [`curve`] | Screen-space curve sampling |
//! | [`hit`] | Handle and curve-body hit-testing |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`routing`] | UI regions that capture pointer events before the canvas |
//! | [`entry`] | Function-editor text parsing |
//! | [`render`] | Frame drawing over the [`render::Surface`] trait |
//! | [`surface`] | `Surface` for a browser 2D context |
//! | [`theme`] | Palettes and persisted theme selection |
//! | [`color`] | Hex parsing, opacity and automatic shape colors |
//! | [`config`] | Host-supplied tuning knobs |
//! | [`consts`] | Shared numeric constants (zoom limits, hit radii, etc.) |

pub mod camera;
pub mod color;
pub mod config;
pub mod consts;
pub mod curve;
pub mod doc;
pub mod engine;
pub mod entry;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod render;
pub mod routing;
pub mod scene;
pub mod surface;
pub mod theme;
