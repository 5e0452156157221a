mod external;
mod ffmpeg_command;
mod ffprobe_info;
mod host_resources;
mod mkvtoolnix;
mod path_validator;
mod process_runner;
mod toolchain;
mod video_scanner;

#[cfg(test)]
pub mod fake_tools;

pub use external::ExternalTools;
pub use ffmpeg_command::{FfmpegCommand, parse_max_volume};
pub use ffprobe_info::{parse_channels, parse_duration, parse_reported_bitrate};
pub use host_resources::HostResources;
pub use mkvtoolnix::parse_identify_output;
pub use path_validator::{validate_directory_exists, validate_file_exists};
pub use process_runner::{ToolOutput, describe_command, run_tool};
pub use toolchain::{
    AudioEncodeJob, AudioEncoder, Demuxer, Inspector, Muxer, TimeWindow, Toolchain,
    VideoEncodeJob, VideoEncoder,
};
pub use video_scanner::{VideoFileInfo, is_generated_output, scan_video_files};
