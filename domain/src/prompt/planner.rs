//! Prompt templates for the planner model

use crate::action::ActionVocabulary;
use crate::tool::ToolSpec;

/// Templates for the three planner calls: initial plan, replan and final
/// analysis
pub struct PlannerPromptTemplate;

impl PlannerPromptTemplate {
    /// System prompt describing the robot, its tools and the reply format.
    pub fn system(tools: &ToolSpec, actions: &ActionVocabulary) -> String {
        let tool_descriptions = tools
            .all()
            .enumerate()
            .map(|(i, t)| {
                let params = if t.parameters.is_empty() {
                    "   - Takes no parameters.".to_string()
                } else {
                    t.parameters
                        .iter()
                        .map(|p| {
                            let required = if p.required { "required" } else { "optional" };
                            format!(
                                "   - \"{}\" ({}, {}): {}",
                                p.name, p.param_type, required, p.description
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n")
                };
                format!("{}) \"{}\"\n   - {}\n{}", i + 1, t.name, t.description, params)
            })
            .collect::<Vec<_>>()
            .join("\n\n");

        let schemas = tools
            .all()
            .map(|t| format!("    - For \"{}\": {}", t.name, t.params_hint()))
            .collect::<Vec<_>>()
            .join("\n");

        let tool_names = tools
            .names()
            .map(|n| format!("\"{}\"", n))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            r#"You are a robot with a physical body: a camera (head), legs and hands. Your body is bipedal. You can move around and look at the environment using the tools below.

Action mapping:
- "move right", "go right" or "turn right" use "right_move"
- "move left", "go left" or "turn left" use "left_move"
- "move forward", "go forward" or "walk forward" use "go_forward"
- "move backward" or "go backward" use "back"
- "pick up" uses "catch_ball" (it lifts any object, not just a ball)
- "put down" uses "put_down"
- "look up" uses "Control Servo" with a position above 1500
- "look down" uses "Control Servo" with a position below 1500

Tools:
{tool_descriptions}

Reply ONLY with valid JSON in this form, with no other text, markdown or thinking tags:
{{
    "response": "reply to the user",
    "plan": [
        {{"step": 1, "tool": "Tool Name", "params": {{"ParameterName": "ParameterValue"}}}}
    ]
}}

Rules:
- "tool" must be exactly one of: {tool_names}.
- "params" must match the schema:
{schemas}
- "step" starts at 1 and increases in execution order.
- A repeated command ("twice", "3 times") becomes that many identical steps.
- "Propagate Action" must use exactly one of the allowed actions. Anything else fails with a validation error.
- If a result says an action is "not one of" the allowed list, choose a different allowed action with a similar effect and replan from that point.

Allowed actions:
{actions}
"#,
            tool_descriptions = tool_descriptions,
            tool_names = tool_names,
            schemas = schemas,
            actions = actions.to_prompt_list(),
        )
    }

    /// Prompt asking for a corrected plan suffix after a failing step.
    pub fn replan(
        failing_text: &str,
        scene_summary: &str,
        original_command: &str,
        actions: &ActionVocabulary,
        system_prompt: &str,
    ) -> String {
        format!(
            r#"The previous plan failed with error: {failing_text}
You are correcting a failed robot plan.
Current scene: {scene_summary}
Original user command: {original_command}

Repetition: "twice" means 2 identical steps, "3 times" means 3 identical steps.

Create a corrected plan for the remaining work using ONLY valid tools and actions.
Use ONLY these action names: {actions}
Return ONLY JSON with the corrected plan.

Original system prompt:
{system_prompt}"#,
            failing_text = failing_text,
            scene_summary = scene_summary,
            original_command = original_command,
            actions = actions.to_prompt_list(),
            system_prompt = system_prompt,
        )
    }

    /// Prompt asking for a short natural-language summary of a finished run.
    pub fn final_analysis(user_input: &str, execution_summary: &str) -> String {
        format!(
            r#"User asked: "{user_input}"
The robot executed this plan:
{execution_summary}

Based on the executed results, give a concise final response to the user about what was accomplished and what was found.
Example: The action 'wave' was executed successfully, and the request to wave was completed."#,
            user_input = user_input,
            execution_summary = execution_summary,
        )
    }
}
