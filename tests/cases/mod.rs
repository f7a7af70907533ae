#[macro_export]
macro_rules! run_vm {
    (
        $name:ident,
        files: [ $($src:expr),+ $(,)? ]
        $(, stdin: $stdin:expr)?
        $(, stdout: $stdout:expr)?
        $(, error: $err:pat)?
        $(, post: $post:expr)?
        $(,)?
    ) => {
        #[test]
        fn $name() {
            #![allow(unused_mut, unused_variables, unused_assignments)]

            let sources: Vec<&str> = vec![$($src),+];
            let mut files = Vec::new();
            for (i, src) in sources.iter().enumerate() {
                let unit = jackal::parser::parse(src)
                    .unwrap_or_else(|e| panic!("test program should parse: {e}"));
                files.push(jackal::File::new(
                    format!("test{i}.vm"),
                    (*src).to_string(),
                    unit,
                ));
            }
            let mut prog = jackal::Program::new(files);

            let mut input: &[u8] = b"";
            $( input = $stdin.as_bytes(); )?
            let mut console = jackal::MemConsole::new(input);

            let result = jackal::Vm::new(&mut prog, &mut console).run();

            let mut expects_error = false;
            $(
                expects_error = true;
                match &result {
                    Err(err) => assert!(
                        matches!(err.kind, $err),
                        "unexpected error kind: {:?}",
                        err.kind
                    ),
                    Ok(()) => panic!("expected an execution error"),
                }
            )?
            if !expects_error {
                if let Err(e) = &result {
                    panic!("execution failed: {e}");
                }
            }

            $( pretty_assertions::assert_eq!(console.output_str(), $stdout); )?

            // Optional closure receiving the final program state and the
            // console, for invariants the other fields can't express.
            $( ($post)(&prog, &console); )?
        }
    };
}
