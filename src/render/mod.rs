/// Pixel buffer type and the rasterizer contract.
pub mod backend;
/// Frame compositing over a [`backend::Rasterizer`].
pub mod compositor;
/// `vello_cpu` rasterizer.
pub mod cpu;
