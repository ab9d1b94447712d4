pub mod density_2d;
pub mod distribution;
pub mod pit;
pub mod simplex;

mod axes_draw;
mod colorbar;
