mod controls;
mod fps;
mod panels;

pub(super) use fps::FpsCounter;
