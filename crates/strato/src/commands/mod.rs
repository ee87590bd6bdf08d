pub mod vpc;
