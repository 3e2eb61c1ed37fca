pub mod mesh_creator;
pub mod obj_loader;

pub use obj_loader::{ load_obj, parse_obj, ObjError };
