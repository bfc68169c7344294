use super::state::{TaskId, Ticks};

/// What a process was doing during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Idle,
    Waiting,
    Running,
}

impl Cell {
    pub fn symbol(self) -> char {
        match self {
            Cell::Idle => ' ',
            Cell::Waiting => '.',
            Cell::Running => '*',
        }
    }
}

/// Process x tick grid filled during one policy run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    horizon: Ticks,
    rows: Vec<Vec<Cell>>,
}

impl Timeline {
    pub fn new(num_tasks: usize, horizon: Ticks) -> Self {
        Self {
            horizon,
            rows: vec![vec![Cell::Idle; horizon as usize]; num_tasks],
        }
    }

    pub fn horizon(&self) -> Ticks {
        self.horizon
    }

    pub fn num_tasks(&self) -> usize {
        self.rows.len()
    }

    pub fn set(&mut self, task: TaskId, tick: Ticks, cell: Cell) {
        if let Some(slot) = self.rows[task].get_mut(tick as usize) {
            *slot = cell;
        }
    }

    pub fn cell(&self, task: TaskId, tick: Ticks) -> Cell {
        self.rows[task][tick as usize]
    }

    pub fn row(&self, task: TaskId) -> &[Cell] {
        &self.rows[task]
    }

    /// The row as trace symbols, one char per tick.
    pub fn row_string(&self, task: TaskId) -> String {
        self.rows[task].iter().map(|c| c.symbol()).collect()
    }

    pub fn running_at(&self, tick: Ticks) -> impl Iterator<Item = TaskId> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(move |(_, row)| row[tick as usize] == Cell::Running)
            .map(|(task, _)| task)
    }

    pub fn count(&self, task: TaskId, cell: Cell) -> usize {
        self.rows[task].iter().filter(|c| **c == cell).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_and_ignores_ticks_past_horizon() {
        let mut timeline = Timeline::new(2, 4);
        timeline.set(0, 1, Cell::Waiting);
        timeline.set(0, 2, Cell::Running);
        timeline.set(1, 9, Cell::Running);

        assert_eq!(timeline.row_string(0), " .* ");
        assert_eq!(timeline.row_string(1), "    ");
        assert_eq!(timeline.running_at(2).collect::<Vec<_>>(), vec![0]);
        assert_eq!(timeline.count(0, Cell::Idle), 2);
    }
}
