// Without the `tracing` feature every log call expands to nothing.

#[cfg(feature = "tracing")]
macro_rules! levent {
    ($level:ident, $($tt:tt)*) => {
        tracing::$level!(target: "incremental_loader", $($tt)*)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! levent {
    ($level:ident, $($tt:tt)*) => {};
}

macro_rules! ltrace {
    ($($tt:tt)*) => { levent!(trace, $($tt)*) };
}

macro_rules! ldebug {
    ($($tt:tt)*) => { levent!(debug, $($tt)*) };
}

macro_rules! lwarn {
    ($($tt:tt)*) => { levent!(warn, $($tt)*) };
}
