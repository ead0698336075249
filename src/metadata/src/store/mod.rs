pub mod path_helpers;
