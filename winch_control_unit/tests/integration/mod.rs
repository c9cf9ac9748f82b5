mod limits;
mod ramp;
mod safety;
#[cfg(unix)]
mod shutdown;
mod startup;
mod support;
