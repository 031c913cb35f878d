pub mod throttle;

pub use throttle::SendThrottle;
