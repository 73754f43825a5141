//! Startup banner.

use std::io::IsTerminal;

/// ANSI true-color escape sequences for the banner palette.
struct Colors {
    frame: &'static str,
    title: &'static str,
    subtitle: &'static str,
    reset: &'static str,
}

const COLOR: Colors = Colors {
    frame: "\x1b[38;2;38;166;154m",
    title: "\x1b[1;38;2;239;83;80m",
    subtitle: "\x1b[38;2;100;100;120m",
    reset: "\x1b[0m",
};

const PLAIN: Colors = Colors {
    frame: "",
    title: "",
    subtitle: "",
    reset: "",
};

/// Prints the banner with the bind address to stdout.
///
/// Renders ANSI true-color when stdout is a terminal,
/// falls back to plain text otherwise.
pub fn print_banner(bind_addr: &str) {
    let c = if std::io::stdout().is_terminal() {
        &COLOR
    } else {
        &PLAIN
    };

    let fr = c.frame;
    let tt = c.title;
    let st = c.subtitle;
    let r = c.reset;

    println!(
        r#"
{fr}╔══════════════════════════════════════════════════╗{r}
{fr}║{r}  {tt}TradingView → MT4 Bridge{r}                        {fr}║{r}
{fr}║{r}  {st}listening on {bind_addr:<35}{r}{fr}║{r}
{fr}╚══════════════════════════════════════════════════╝{r}
"#
    );
}
