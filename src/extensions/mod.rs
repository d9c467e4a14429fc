pub mod date_time_ext;
