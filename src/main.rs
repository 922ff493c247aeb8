use std::env;
use std::fs;
use std::process;

fn main() {
    let mut args = env::args().skip(1);
    let path = match args.next() {
        Some(path) => path,
        None => {
            eprintln!("usage: watc <file.wat> [param ...]");
            process::exit(1);
        }
    };
    let params: Vec<i32> = match args.map(|arg| arg.parse::<i32>()).collect::<Result<_, _>>() {
        Ok(params) => params,
        Err(_) => {
            eprintln!("parameters must be 32-bit integers");
            process::exit(1);
        }
    };

    let source = match fs::read_to_string(&path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("{path}: {err}");
            process::exit(1);
        }
    };

    if let Err(err) = run_pipeline(&source, &params) {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn run_pipeline(source: &str, params: &[i32]) -> Result<(), watc::Error> {
    let module = watc::wat::parse(source)?;
    let bytes = watc::encoder::encode(&module)?;
    println!("encoded module ({} bytes): {}", bytes.len(), hex::encode(&bytes));

    let execution = watc::run(&bytes, params)?;
    for (index, outcome) in execution.functions.iter().enumerate() {
        let name = module
            .get_function_name(index as u32)
            .unwrap_or("<anonymous>");
        for op in &outcome.trace {
            println!("{name}: {op}");
        }
        println!("{name}: stack {:?}", outcome.stack);
    }
    Ok(())
}
