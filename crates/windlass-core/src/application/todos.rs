//! Sprint TODO document generation.
//!
//! Each template ships a set of sprint plans. After generation one markdown
//! file per non-empty sprint is written to `docs/TODO.<project>.<n>.md`,
//! giving the new project a concrete first backlog.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, Local};
use tracing::{debug, info};

use crate::error::CoreResult;

const SPRINT_DAYS: i64 = 14;
const MAX_SPRINTS: u8 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

struct Task {
    title: &'static str,
    detail: &'static str,
    priority: Priority,
    hours: u32,
}

struct Category {
    title: &'static str,
    tasks: &'static [Task],
}

pub struct TodoGenerator;

impl TodoGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Write one TODO file per non-empty sprint into `docs/`.
    ///
    /// Returns the paths written. Templates with no plan (unknown names)
    /// fall back to the generic plan rather than producing nothing.
    pub fn generate_all(
        &self,
        project_dir: &Path,
        project_slug: &str,
        template: &str,
    ) -> CoreResult<Vec<PathBuf>> {
        let docs_dir = project_dir.join("docs");
        fs::create_dir_all(&docs_dir)?;

        let mut written = Vec::new();
        for sprint in 1..=MAX_SPRINTS {
            let plan = sprint_plan(template, sprint);
            if plan.is_empty() {
                continue;
            }
            let path = docs_dir.join(format!("TODO.{project_slug}.{sprint}.md"));
            fs::write(&path, render_sprint(project_slug, sprint, plan))?;
            debug!(sprint, path = %path.display(), "sprint plan written");
            written.push(path);
        }
        info!(count = written.len(), template, "sprint TODO documents generated");
        Ok(written)
    }
}

impl Default for TodoGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn render_sprint(project: &str, sprint: u8, plan: &[Category]) -> String {
    let now = Local::now();
    let end = now + Duration::days(SPRINT_DAYS);
    let mut out = format!(
        "# TODO List: {project} - Sprint {sprint}\n\n\
         **Generated:** {}\n\
         **Sprint Duration:** {} to {}\n\n\
         ## Sprint {sprint} Objectives\n\n",
        now.format("%Y-%m-%d %H:%M"),
        now.format("%Y-%m-%d"),
        end.format("%Y-%m-%d"),
    );

    let mut counter = 1;
    for category in plan {
        out.push_str(&format!("## {}\n\n", category.title));
        for task in category.tasks {
            out.push_str(&format!(
                "- [ ] **{counter:02}.** [{}] {}\n  *{}*\n  Estimated: {}h\n\n",
                task.priority.label(),
                task.title,
                task.detail,
                task.hours,
            ));
            counter += 1;
        }
    }

    let total_hours: u32 = plan.iter().flat_map(|c| c.tasks).map(|t| t.hours).sum();
    let count_by = |p: Priority| {
        plan.iter()
            .flat_map(|c| c.tasks)
            .filter(|t| t.priority == p)
            .count()
    };
    out.push_str(&format!(
        "## Sprint Metrics\n\n\
         - **Total Tasks:** {}\n\
         - **Estimated Hours:** {total_hours}\n\
         - **High Priority:** {}\n\
         - **Medium Priority:** {}\n\
         - **Low Priority:** {}\n\n\
         ## Definition of Done\n\n\
         - [ ] All tasks completed and tested\n\
         - [ ] Code review completed\n\
         - [ ] Documentation updated\n\
         - [ ] Tests passing (unit + integration)\n\
         - [ ] Ready for next sprint\n",
        counter - 1,
        count_by(Priority::High),
        count_by(Priority::Medium),
        count_by(Priority::Low),
    ));
    out
}

/// The static plan for one template and sprint. Unknown templates get the
/// generic plan.
fn sprint_plan(template: &str, sprint: u8) -> &'static [Category] {
    match template {
        "python-game-development" => game_dev_plan(sprint),
        "python-agentic-ai" => agentic_ai_plan(sprint),
        "python-data-science" => data_science_plan(sprint),
        _ => generic_plan(sprint),
    }
}

fn game_dev_plan(sprint: u8) -> &'static [Category] {
    match sprint {
        1 => &[
            Category {
                title: "Project Infrastructure",
                tasks: &[
                    Task {
                        title: "Set up Python project structure",
                        detail: "Verify pyproject.toml and src/ layout, pin dependencies",
                        priority: Priority::High,
                        hours: 2,
                    },
                    Task {
                        title: "Configure development tools",
                        detail: "Ruff, MyPy and pre-commit hooks",
                        priority: Priority::High,
                        hours: 1,
                    },
                    Task {
                        title: "Set up testing infrastructure",
                        detail: "Configure pytest and add the first test module",
                        priority: Priority::High,
                        hours: 2,
                    },
                ],
            },
            Category {
                title: "Core Game Engine",
                tasks: &[
                    Task {
                        title: "Initialize pygame and create the main window",
                        detail: "Window creation and basic event handling",
                        priority: Priority::High,
                        hours: 3,
                    },
                    Task {
                        title: "Implement the game loop",
                        detail: "Update/render cycle with FPS control",
                        priority: Priority::High,
                        hours: 2,
                    },
                    Task {
                        title: "Create game state management",
                        detail: "Menu, playing, paused and game-over states",
                        priority: Priority::Medium,
                        hours: 3,
                    },
                ],
            },
        ],
        2 => &[Category {
            title: "Game Mechanics",
            tasks: &[
                Task {
                    title: "Implement player controls",
                    detail: "Keyboard input for movement and actions",
                    priority: Priority::High,
                    hours: 4,
                },
                Task {
                    title: "Create the enemy spawn system",
                    detail: "Wave generation with increasing difficulty",
                    priority: Priority::High,
                    hours: 3,
                },
                Task {
                    title: "Implement collision detection",
                    detail: "Projectile and entity collision handling",
                    priority: Priority::High,
                    hours: 4,
                },
            ],
        }],
        3 => &[Category {
            title: "Visual and Audio",
            tasks: &[
                Task {
                    title: "Add sprite graphics",
                    detail: "Replace placeholder shapes with sprites",
                    priority: Priority::Medium,
                    hours: 5,
                },
                Task {
                    title: "Implement sound effects and music",
                    detail: "Action feedback and background music",
                    priority: Priority::Medium,
                    hours: 3,
                },
                Task {
                    title: "Add particle effects",
                    detail: "Visual feedback for destroyed entities",
                    priority: Priority::Low,
                    hours: 4,
                },
            ],
        }],
        4 => &[Category {
            title: "Features and Polish",
            tasks: &[
                Task {
                    title: "Implement scoring and high scores",
                    detail: "Track and persist player scores",
                    priority: Priority::Medium,
                    hours: 3,
                },
                Task {
                    title: "Add difficulty levels",
                    detail: "Easy, medium and hard enemy patterns",
                    priority: Priority::Medium,
                    hours: 4,
                },
                Task {
                    title: "Create menu and game-over screens",
                    detail: "Navigation between game states",
                    priority: Priority::High,
                    hours: 3,
                },
            ],
        }],
        _ => &[],
    }
}

fn agentic_ai_plan(sprint: u8) -> &'static [Category] {
    match sprint {
        1 => &[
            Category {
                title: "Infrastructure Setup",
                tasks: &[
                    Task {
                        title: "Set up the agent project structure",
                        detail: "Initialize agents, tasks and crew wiring",
                        priority: Priority::High,
                        hours: 3,
                    },
                    Task {
                        title: "Configure FastAPI with async support",
                        detail: "API endpoints for agent interactions",
                        priority: Priority::High,
                        hours: 2,
                    },
                    Task {
                        title: "Define Pydantic models",
                        detail: "Typed inputs and outputs for every agent",
                        priority: Priority::High,
                        hours: 2,
                    },
                ],
            },
            Category {
                title: "Agent Development",
                tasks: &[
                    Task {
                        title: "Create a research agent",
                        detail: "Information gathering and analysis",
                        priority: Priority::Medium,
                        hours: 4,
                    },
                    Task {
                        title: "Implement a writer agent",
                        detail: "Content generation and formatting",
                        priority: Priority::Medium,
                        hours: 3,
                    },
                ],
            },
        ],
        _ => &[],
    }
}

fn data_science_plan(sprint: u8) -> &'static [Category] {
    match sprint {
        1 => &[Category {
            title: "Data Infrastructure",
            tasks: &[
                Task {
                    title: "Set up Polars for data processing",
                    detail: "High-performance dataframe pipeline skeleton",
                    priority: Priority::High,
                    hours: 2,
                },
                Task {
                    title: "Configure DuckDB for analytics",
                    detail: "Embedded analytics database and first queries",
                    priority: Priority::High,
                    hours: 3,
                },
            ],
        }],
        _ => &[],
    }
}

fn generic_plan(sprint: u8) -> &'static [Category] {
    match sprint {
        1 => &[Category {
            title: "Project Setup",
            tasks: &[
                Task {
                    title: "Review and customize project requirements",
                    detail: "Analyze specific needs and adapt the scaffold",
                    priority: Priority::High,
                    hours: 2,
                },
                Task {
                    title: "Verify tooling and test run",
                    detail: "Run linters and the test suite once end to end",
                    priority: Priority::High,
                    hours: 1,
                },
            ],
        }],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn game_dev_template_produces_four_sprints() {
        let dir = tempdir().unwrap();
        let written = TodoGenerator::new()
            .generate_all(dir.path(), "space-invaders", "python-game-development")
            .unwrap();

        assert_eq!(written.len(), 4);
        for sprint in 1..=4 {
            assert!(
                dir.path()
                    .join(format!("docs/TODO.space-invaders.{sprint}.md"))
                    .is_file()
            );
        }
    }

    #[test]
    fn base_template_produces_only_sprint_one() {
        let dir = tempdir().unwrap();
        let written = TodoGenerator::new()
            .generate_all(dir.path(), "demo", "python-modern")
            .unwrap();

        assert_eq!(written.len(), 1);
        assert!(written[0].ends_with("TODO.demo.1.md"));
    }

    #[test]
    fn sprint_document_contains_metrics_and_tasks() {
        let dir = tempdir().unwrap();
        TodoGenerator::new()
            .generate_all(dir.path(), "demo", "python-game-development")
            .unwrap();

        let text =
            fs::read_to_string(dir.path().join("docs/TODO.demo.1.md")).unwrap();
        assert!(text.contains("# TODO List: demo - Sprint 1"));
        assert!(text.contains("- [ ] **01.** [high]"));
        assert!(text.contains("**Total Tasks:** 6"));
        assert!(text.contains("## Definition of Done"));
    }

    #[test]
    fn unknown_template_falls_back_to_generic_plan() {
        let dir = tempdir().unwrap();
        let written = TodoGenerator::new()
            .generate_all(dir.path(), "demo", "something-else")
            .unwrap();

        assert_eq!(written.len(), 1);
        let text = fs::read_to_string(&written[0]).unwrap();
        assert!(text.contains("Project Setup"));
    }
}
