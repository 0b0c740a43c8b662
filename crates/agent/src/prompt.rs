use codehelper_page::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    /// No error on the page: nudge the student one small step forward.
    Guidance,
    /// The page shows an error: ask for a corrected program.
    Debugging,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub text: String,
}

pub fn build_prompt(snapshot: &Snapshot) -> Prompt {
    if snapshot.has_error() {
        Prompt {
            kind: PromptKind::Debugging,
            text: debugging_prompt(snapshot),
        }
    } else {
        Prompt {
            kind: PromptKind::Guidance,
            text: guidance_prompt(snapshot),
        }
    }
}

fn debugging_prompt(snapshot: &Snapshot) -> String {
    format!(
        r#"You are an expert Python debugging assistant.
A student is working on the following problem:
--- PROBLEM ---
{problem}
--- END PROBLEM ---

This is their code, which is failing:
--- CODE ---
{code}
--- END CODE ---

When they run it, the "Actual Output" box shows this error:
--- ERROR ---
{error}
--- END ERROR ---

Reply with a single, complete block of corrected Python code that fixes this error.
After the code block, briefly explain what caused the error and what you changed.
"#,
        problem = snapshot.problem_text,
        code = snapshot.current_code,
        error = snapshot.error_text.trim(),
    )
}

fn guidance_prompt(snapshot: &Snapshot) -> String {
    format!(
        r#"You are an expert Python coding assistant acting as a pair programmer.
A student is working on the following problem:
--- PROBLEM ---
{problem}
--- END PROBLEM ---

This is their code so far (it might be empty):
--- CODE ---
{code}
--- END CODE ---

Your goal is to guide, not to solve.
Do NOT provide the full solution.

Provide only the very next logical line or small block of code (1-3 lines at most) that moves the student forward.
- If the code is empty, give the first logical step, such as a function definition or an initial variable.
- If the code is on the right track, give the line that should come next.

After the code block, add a single sentence on a new line explaining why this is the next step.

For example:
```python
def solve():
```
Start by defining a function to organize your code.
"#,
        problem = snapshot.problem_text,
        code = snapshot.current_code,
    )
}
