pub mod silence;
pub mod wav_format;
