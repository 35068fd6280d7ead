pub fn run() {
    println!("Available commands:");
    println!();
    println!("  -search <document> <pattern>           Find the first occurrence");
    println!("  -search <document> <pattern> --all     List every occurrence");
    println!("  -replace <document> <pattern> <text>   Replace every occurrence");
    println!("  -help                                  Show this help message");
    println!("  -show-config                           Display current configuration");
    println!("  -validate-config                       Validate configuration file");
    println!("  --version                              Show version information");
    println!();
    println!("Search flags: --case-sensitive --hyphen-tolerant --wildcard --backward");
    println!("Documents are JSON ({{\"pages\":[{{\"fragments\":[...]}}]}}) or plain text,");
    println!("with form feeds separating pages.");
}
