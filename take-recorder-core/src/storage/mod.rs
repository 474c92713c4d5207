pub mod checksum_registrar;
pub mod metadata;
pub mod wav_writer;
