/// A document with `conflicts` two-way conflicts separated by plain lines,
/// every third one carrying a common-ancestors block.
pub fn generate_conflicted_content(conflicts: usize) -> String {
    let mut content = String::new();
    for i in 0..conflicts {
        content.push_str(&format!("fn unchanged_{i}() {{}}\n\n"));
        content.push_str("<<<<<<< HEAD\n");
        content.push_str(&format!("let value = {i};\nlet other = {i} * 2;\n"));
        if i % 3 == 0 {
            content.push_str("||||||| merged common ancestors\n");
            content.push_str(&format!("let value = {};\n", i + 1));
        }
        content.push_str("=======\n");
        content.push_str(&format!("let value = {};\n", i * 10));
        content.push_str(&format!(">>>>>>> feature/branch-{i}\n\n"));
    }
    content
}
