//! Quantizer grid extraction from decoder side data.
//!
//! Decoders no longer expose the legacy per-macroblock `qscale_table`;
//! instead they attach `AV_FRAME_DATA_VIDEO_ENC_PARAMS` side data to each
//! decoded frame when the codec context was opened with the matching
//! `export_side_data` flag (see [`crate::analyzer`]). The safe `ffmpeg-next`
//! wrapper has no API for this side data, so this module reads it through
//! raw `ffmpeg_sys_next` pointers, bounds-checked against the reported side
//! data size, and rasterizes the per-block quantizer parameters into the
//! macroblock [`QuantizerGrid`] the sampler consumes.

use ffmpeg_next::frame::Video as VideoFrame;
use ffmpeg_sys_next::{AVFrameSideDataType, av_frame_get_side_data};

use crate::sampler::{MACROBLOCK_SIZE, QuantizerGrid, macroblocks};

// `ffmpeg-sys-next` 8.x does not bind `libavutil/video_enc_params.h`, so the
// `AVVideoEncParams` / `AVVideoBlockParams` layouts it documents are not
// exported as Rust types. Mirror the C ABI locally so the raw side-data
// payload can be interpreted; field order and widths match
// `libavutil/video_enc_params.h` exactly.
#[repr(C)]
struct AVVideoEncParams {
    nb_blocks: u32,
    blocks_offset: usize,
    block_size: usize,
    type_: i32,
    qp: i32,
    delta_qp: [[i32; 2]; 4],
}

#[repr(C)]
struct AVVideoBlockParams {
    src_x: i32,
    src_y: i32,
    w: i32,
    h: i32,
    delta_qp: i32,
}

/// Build the per-macroblock quantizer grid for a decoded frame.
///
/// Returns `None` when the frame carries no usable video-encoding-params
/// side data (decoder doesn't export it, or the payload is truncated). The
/// produced grid has one cell per `ceil(width/16) × ceil(height/16)`
/// macroblock with stride equal to the macroblock row width.
pub(crate) fn quantizer_grid(
    frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Option<QuantizerGrid> {
    if width == 0 || height == 0 {
        return None;
    }

    let side_data = unsafe {
        av_frame_get_side_data(
            frame.as_ptr(),
            AVFrameSideDataType::AV_FRAME_DATA_VIDEO_ENC_PARAMS,
        )
    };
    if side_data.is_null() {
        return None;
    }

    let (data, size) = unsafe { ((*side_data).data as *const u8, (*side_data).size) };
    if data.is_null() || size < std::mem::size_of::<AVVideoEncParams>() {
        return None;
    }

    // The payload starts with an AVVideoEncParams header followed by
    // nb_blocks AVVideoBlockParams records at blocks_offset, each
    // block_size bytes apart.
    let params = unsafe { &*(data as *const AVVideoEncParams) };
    let nb_blocks = params.nb_blocks as usize;

    if nb_blocks > 0 {
        if params.block_size < std::mem::size_of::<AVVideoBlockParams>() {
            return None;
        }
        let blocks_end = params
            .blocks_offset
            .checked_add(nb_blocks.checked_mul(params.block_size)?)?;
        if blocks_end > size {
            return None;
        }
    }

    let columns = macroblocks(width);
    let rows = macroblocks(height);

    // Blocks may cover only part of the frame (or be absent entirely for
    // constant-QP content); cells they don't touch keep the base QP.
    let mut codes = vec![params.qp; columns * rows];

    for index in 0..nb_blocks {
        let block = unsafe {
            &*(data.add(params.blocks_offset + index * params.block_size)
                as *const AVVideoBlockParams)
        };

        let x0 = i64::from(block.src_x).clamp(0, i64::from(width)) as u64;
        let y0 = i64::from(block.src_y).clamp(0, i64::from(height)) as u64;
        let x1 = (i64::from(block.src_x) + i64::from(block.w)).clamp(x0 as i64, i64::from(width))
            as u64;
        let y1 = (i64::from(block.src_y) + i64::from(block.h)).clamp(y0 as i64, i64::from(height))
            as u64;
        if x0 == x1 || y0 == y1 {
            continue;
        }

        let qp = params.qp.saturating_add(block.delta_qp);

        let mb_size = u64::from(MACROBLOCK_SIZE);
        let column_start = (x0 / mb_size) as usize;
        let column_end = (x1.div_ceil(mb_size) as usize).min(columns);
        let row_start = (y0 / mb_size) as usize;
        let row_end = (y1.div_ceil(mb_size) as usize).min(rows);

        for row in row_start..row_end {
            for cell in &mut codes[row * columns + column_start..row * columns + column_end] {
                *cell = qp;
            }
        }
    }

    Some(QuantizerGrid::new(codes, columns))
}
