mod archive;
mod keying;
mod png;
mod report;

pub use archive::{
    ExportOptions, ExportSummary, ExportedFrame, crop_frame, export_zip, frame_entry_name,
    write_archive,
};
pub use keying::{KEYED_PIXEL, key_out_background};
pub use png::encode_png;
pub use report::layout_json;
