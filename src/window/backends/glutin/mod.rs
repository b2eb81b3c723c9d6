mod types;
mod visitor;

use crate::errors::*;

use super::super::WindowParams;
use super::Visitor;

/// Opens a window with a current OpenGL context and loads the GL function
/// pointers from it.
pub fn new(params: &WindowParams) -> Result<Box<dyn Visitor>> {
    let visitor = self::visitor::GlutinVisitor::from(params)?;
    Ok(Box::new(visitor))
}
