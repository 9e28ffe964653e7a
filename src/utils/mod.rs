pub mod sample_video;
