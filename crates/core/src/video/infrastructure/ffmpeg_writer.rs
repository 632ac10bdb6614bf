use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Frame rate used when the source does not report one.
const FALLBACK_FPS: i32 = 30;

/// MPEG-4 Part 2 caps the time base denominator at 16 bits.
const MAX_TIME_BASE_DEN: i32 = 65535;

/// Encodes RGB frames as MPEG-4 Part 2 (`mp4v`) via ffmpeg-next.
///
/// The output keeps the source dimensions and frame rate. No audio is
/// carried over.
pub struct FfmpegWriter {
    octx: Option<ffmpeg_next::format::context::Output>,
    encoder: Option<ffmpeg_next::codec::encoder::video::Encoder>,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    width: u32,
    height: u32,
    frame_rate: ffmpeg_next::Rational,
    frame_count: usize,
    video_stream_index: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self {
            octx: None,
            encoder: None,
            scaler: None,
            width: 0,
            height: 0,
            frame_rate: ffmpeg_next::Rational(FALLBACK_FPS, 1),
            frame_count: 0,
            video_stream_index: 0,
        }
    }

    fn drain_packets(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let (Some(encoder), Some(octx)) = (self.encoder.as_mut(), self.octx.as_mut()) else {
            return Ok(());
        };
        let ost_time_base = octx
            .stream(self.video_stream_index)
            .ok_or("FfmpegWriter: output stream missing")?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.video_stream_index);
            encoded.rescale_ts(self.frame_rate.invert(), ost_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        self.width = metadata.width;
        self.height = metadata.height;
        self.frame_rate = encoder_frame_rate(metadata.fps);

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);
        encoder_ctx.set_time_base(self.frame_rate.invert());
        encoder_ctx.set_frame_rate(Some(self.frame_rate));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);
        self.video_stream_index = ost.index();

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.octx = Some(octx);
        self.encoder = Some(encoder);
        self.scaler = Some(scaler);
        self.frame_count = 0;

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let encoder = self.encoder.as_mut().ok_or("FfmpegWriter: not opened")?;
        let scaler = self.scaler.as_mut().ok_or("FfmpegWriter: not opened")?;

        if frame.width() != self.width || frame.height() != self.height || frame.channels() != 3
        {
            return Err(format!(
                "FfmpegWriter: expected {}x{} RGB frame, got {}x{}x{}",
                self.width,
                self.height,
                frame.width(),
                frame.height(),
                frame.channels()
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            self.width,
            self.height,
        );

        let stride = rgb_frame.stride(0);
        let row_bytes = self.width as usize * 3;
        let data = rgb_frame.data_mut(0);
        for (row, src) in frame.data().chunks_exact(row_bytes).enumerate() {
            let dst_start = row * stride;
            data[dst_start..dst_start + row_bytes].copy_from_slice(src);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(self.frame_count as i64));

        encoder.send_frame(&yuv_frame)?;
        self.drain_packets()?;

        self.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(encoder) = self.encoder.as_mut() {
            encoder.send_eof()?;
            self.drain_packets()?;
            if let Some(octx) = self.octx.as_mut() {
                octx.write_trailer()?;
            }
        }

        self.octx = None;
        self.encoder = None;
        self.scaler = None;

        Ok(())
    }
}

/// Rational frame rate for the encoder: the source rate approximated so
/// both terms fit in 16 bits, or 30 fps when the source rate is unknown.
///
/// The encoder time base is the inverse of this rate, so the numerator
/// here becomes the time base denominator.
fn encoder_frame_rate(fps: f64) -> ffmpeg_next::Rational {
    if !fps.is_finite() || fps <= 0.0 {
        return ffmpeg_next::Rational(FALLBACK_FPS, 1);
    }
    // Safety: av_d2q only does arithmetic on its arguments.
    let bounded: ffmpeg_next::Rational =
        unsafe { ffmpeg_next::ffi::av_d2q(fps, MAX_TIME_BASE_DEN) }.into();
    if fits_time_base(bounded) {
        return bounded;
    }
    let rounded = fps.round().min(MAX_TIME_BASE_DEN as f64) as i32;
    ffmpeg_next::Rational(if rounded <= 0 { FALLBACK_FPS } else { rounded }, 1)
}

fn fits_time_base(rate: ffmpeg_next::Rational) -> bool {
    (1..=MAX_TIME_BASE_DEN).contains(&rate.numerator())
        && (1..=MAX_TIME_BASE_DEN).contains(&rate.denominator())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
    use approx::assert_relative_eq;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: w,
            height: h,
            fps,
            total_frames: 0,
            codec: String::new(),
            source_path: None,
        }
    }

    fn solid_frame(index: usize, w: u32, h: u32, value: u8) -> Frame {
        Frame::new(vec![value; (w * h * 3) as usize], w, h, 3, index)
    }

    #[test]
    fn test_encoder_frame_rate() {
        assert_eq!(encoder_frame_rate(30.0), ffmpeg_next::Rational(30, 1));
        assert_eq!(encoder_frame_rate(0.0), ffmpeg_next::Rational(30, 1));
        assert_eq!(encoder_frame_rate(f64::NAN), ffmpeg_next::Rational(30, 1));
        let ntsc = encoder_frame_rate(30000.0 / 1001.0);
        assert_relative_eq!(
            ntsc.numerator() as f64 / ntsc.denominator() as f64,
            30000.0 / 1001.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_encoder_frame_rate_bounds_time_base() {
        let fps = 90000.0 / 3001.0;
        let rate = encoder_frame_rate(fps);
        assert!(rate.numerator() <= MAX_TIME_BASE_DEN, "{rate:?}");
        assert!(rate.denominator() <= MAX_TIME_BASE_DEN, "{rate:?}");
        assert!(fits_time_base(rate.invert()));
        assert_relative_eq!(
            rate.numerator() as f64 / rate.denominator() as f64,
            fps,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_encoder_frame_rate_large_rate() {
        let rate = encoder_frame_rate(120000.0);
        assert!(fits_time_base(rate), "{rate:?}");
    }

    #[test]
    fn test_open_at_fine_grained_source_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("odd_rate.mp4");

        let mut writer = FfmpegWriter::new();
        writer
            .open(&path, &metadata(160, 120, 90000.0 / 3001.0))
            .unwrap();
        for i in 0..3 {
            writer.write(&solid_frame(i, 160, 120, 64)).unwrap();
        }
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        let read_meta = reader.open(&path).unwrap();
        assert!((read_meta.fps - 30.0).abs() < 0.5, "fps {}", read_meta.fps);
        assert_eq!(reader.frames().filter(|f| f.is_ok()).count(), 3);
        reader.close();
    }

    #[test]
    fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        for i in 0..3 {
            writer.write(&solid_frame(i, 160, 120, 128)).unwrap();
        }
        writer.close().unwrap();

        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_zero_frames_still_produces_container() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 25.0)).unwrap();
        writer.close().unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_write_without_open_returns_error() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&solid_frame(0, 160, 120, 128)).is_err());
    }

    #[test]
    fn test_write_rejects_wrong_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(160, 120, 30.0))
            .unwrap();
        assert!(writer.write(&solid_frame(0, 80, 60, 0)).is_err());
        writer.close().unwrap();
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.mp4");
        let mut writer = FfmpegWriter::new();
        assert!(writer.open(&path, &metadata(160, 120, 30.0)).is_err());
    }

    #[test]
    fn test_close_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 30.0)).unwrap();
        writer.write(&solid_frame(0, 160, 120, 128)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn test_roundtrip_preserves_geometry_and_count() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 24.0)).unwrap();
        for i in 0..3 {
            writer.write(&solid_frame(i, 160, 120, 128)).unwrap();
        }
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        let read_meta = reader.open(&path).unwrap();
        assert_eq!(read_meta.width, 160);
        assert_eq!(read_meta.height, 120);
        assert!((read_meta.fps - 24.0).abs() < 0.5, "fps {}", read_meta.fps);

        let frames: Vec<_> = reader.frames().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 3);

        // Codec is lossy, but the overall brightness should be close
        let first = &frames[0];
        let avg: f64 =
            first.data().iter().map(|&b| b as f64).sum::<f64>() / first.data().len() as f64;
        assert!(
            (avg - 128.0).abs() < 40.0,
            "Average pixel value {avg} should be close to 128"
        );
    }
}
