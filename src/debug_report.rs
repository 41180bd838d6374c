use chatroute::{CommandListing, DispatchReport, LocaleFit, Outcome, ReplyStyle, ResolutionTrace};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            if self.enabled { format!("{}{}{}", color, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", BOLD, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            if self.enabled { format!("{}{}{}", DIM, s.as_ref(), RESET) } else { s.as_ref().to_string() }
        }
    }
}

pub fn print_dispatch(message: &str, report: &DispatchReport, color: bool) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Dispatching: \"{}\"", message), ansi::CYAN)));

    if let Some(trace) = &report.trace {
        println!("\n{}", palette.paint("━━━ Routing ━━━", ansi::GRAY));
        print_route(trace, &palette);

        if !trace.candidates.is_empty() {
            println!("\n{}", palette.paint("━━━ Candidates ━━━", ansi::GRAY));
            print_candidates(trace, &palette);
        }
    }

    println!("\n{}", palette.paint("━━━ Outcome ━━━", ansi::GRAY));
    match &report.outcome {
        Outcome::Ignored => {
            println!("  {}", palette.dim("Ignored (not a command)"));
            println!("\n{}", palette.paint("Possible reasons:", ansi::YELLOW));
            println!("  • The message does not start with the command prefix");
            println!("  • No command or group is registered under the first word");
        }
        Outcome::Invoked { command, module, args } => {
            let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
            println!(
                "  {} {} {} {}",
                palette.bold(palette.paint(command, ansi::GREEN)),
                palette.dim("│ module:"),
                palette.paint(module.as_str(), ansi::BLUE),
                palette.dim(format!("│ args: [{}]", args.join(", "))),
            );
        }
        Outcome::Rejected(err) => {
            println!("  {} {}", palette.paint(err.message_key(), ansi::RED), palette.dim(format!("│ {err}")));
        }
    }

    if !report.replies.is_empty() {
        println!("\n{}", palette.paint("━━━ Replies ━━━", ansi::GRAY));
        for reply in &report.replies {
            let color = match reply.style {
                ReplyStyle::Plain => ansi::RESET,
                ReplyStyle::Error => ansi::RED,
                ReplyStyle::Warning => ansi::YELLOW,
                ReplyStyle::Info => ansi::BLUE,
                ReplyStyle::Success => ansi::GREEN,
            };
            println!("  {}", palette.paint(&reply.text, color));
        }
    }

    let m = &report.metrics;
    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Match: {}  │  Resolve: {}  │  Invoke: {}  │  Stage: {}",
        palette.paint(format!("{:?}", m.total), ansi::GREEN),
        palette.paint(format!("{:?}", m.matching), ansi::CYAN),
        palette.dim(format!("{:?}", m.resolve)),
        palette.dim(format!("{:?}", m.invoke)),
        palette.paint(format!("{:?}", m.stage), ansi::YELLOW),
    );
    println!();
}

fn print_route(trace: &ResolutionTrace, palette: &ansi::Palette) {
    let tokens: Vec<String> = trace.tokens.iter().map(|t| format!("{t:?}")).collect();
    println!("  {} [{}]", palette.paint("tokens:", ansi::BLUE), tokens.join(", "));
    println!("  {} {}", palette.paint("locale:", ansi::BLUE), trace.locale.as_deref().unwrap_or("(default)"));

    let Some(route) = &trace.route else {
        println!("  {}", palette.dim("no command matched"));
        return;
    };
    let fit = match route.locale_fit {
        LocaleFit::Exact => palette.paint("exact", ansi::GREEN),
        LocaleFit::Default => palette.paint("default", ansi::YELLOW),
        LocaleFit::Any => palette.paint("other locale", ansi::RED),
    };
    let target = match &route.group {
        Some(group) => format!("{group} {}", route.key),
        None => route.key.clone(),
    };
    println!(
        "  {} {} {} {}",
        palette.paint("route:", ansi::BLUE),
        palette.bold(target),
        palette.dim("│ locale:"),
        fit
    );
    println!("  {} {:?}", palette.paint("args:", ansi::BLUE), route.remaining);
}

fn print_candidates(trace: &ResolutionTrace, palette: &ansi::Palette) {
    for (idx, candidate) in trace.candidates.iter().enumerate() {
        let marker = if candidate.selected { palette.paint("✓", ansi::GREEN) } else { palette.dim("·") };
        let verdict = match (candidate.score, &candidate.failure) {
            (Some(score), _) => palette.paint(format!("score {score}"), ansi::YELLOW),
            (None, Some(failure)) => palette.paint(format!("✗ {failure}"), ansi::RED),
            (None, None) => palette.dim("not scored"),
        };
        println!(
            "  {} {} {} {} {}",
            palette.paint(format!("[{idx}]"), ansi::GRAY),
            marker,
            palette.paint(&candidate.usage, ansi::CYAN),
            palette.dim(format!("({})", candidate.module)),
            verdict,
        );
    }
}

pub fn print_listing(listing: &CommandListing, color: bool) {
    let palette = ansi::Palette::new(color);
    let locale = listing.locale().unwrap_or("default");
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Commands ({locale} locale)"), ansi::CYAN)));
    for (module, commands) in listing.iter() {
        println!("\n{}", palette.paint(format!("━━━ {module} ━━━"), ansi::GRAY));
        for command in commands {
            match listing.description(command) {
                Some(description) => {
                    println!("  {} {}", palette.paint(command, ansi::GREEN), palette.dim(format!("│ {description}")))
                }
                None => println!("  {}", palette.paint(command, ansi::GREEN)),
            }
        }
    }
    println!();
}
