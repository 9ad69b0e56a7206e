use crate::models::Snapshot;
use chrono::NaiveDate;

pub fn render_index(today: NaiveDate, snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    // Keep "</script>" inside string values from closing the bootstrap tag.
    let bootstrap = serde_json::to_string(snapshot)?.replace("</", "<\\/");
    Ok(INDEX_HTML
        .replace("{{TODAY}}", &today.to_string())
        .replace("{{BOOTSTRAP}}", &bootstrap))
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Crier</title>
  <style>
    :root {
      --bg: #f9fafb;
      --ink: #111827;
      --muted: #6b7280;
      --accent: #4f46e5;
      --accent-soft: #eef2ff;
      --done: #22c55e;
      --card: #ffffff;
      --line: #f3f4f6;
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, -apple-system, "Segoe UI", sans-serif;
    }

    nav {
      background: var(--card);
      border-bottom: 1px solid var(--line);
      display: flex;
      justify-content: space-between;
      align-items: center;
      padding: 0 24px;
      height: 64px;
    }

    nav h1 { color: var(--accent); font-size: 1.25rem; margin: 0; }
    nav .links { display: flex; gap: 12px; }

    button {
      border: none;
      border-radius: 6px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 500;
      cursor: pointer;
      background: transparent;
      color: var(--muted);
    }

    button.primary { background: var(--accent); color: white; }
    button.active { background: var(--accent-soft); color: var(--accent); }

    main { max-width: 1120px; margin: 0 auto; padding: 32px 24px; }

    .goals {
      display: grid;
      grid-template-columns: repeat(auto-fill, minmax(300px, 1fr));
      gap: 24px;
      margin-bottom: 32px;
    }

    .card {
      background: var(--card);
      border: 1px solid var(--line);
      border-radius: 12px;
      padding: 20px;
      box-shadow: 0 1px 2px rgba(0, 0, 0, 0.04);
    }

    .bar { background: var(--line); border-radius: 999px; height: 10px; margin-top: 14px; }
    .bar > div { background: var(--accent); border-radius: 999px; height: 10px; transition: width 300ms; }
    .meta { display: flex; justify-content: space-between; color: var(--muted); font-size: 0.85rem; margin-top: 8px; }

    .section-head { display: flex; justify-content: space-between; align-items: center; }
    .periods { display: flex; gap: 6px; }

    .habit {
      display: flex;
      align-items: center;
      justify-content: space-between;
      gap: 12px;
      margin-bottom: 10px;
    }

    .habit .check {
      width: 26px;
      height: 26px;
      padding: 0;
      border-radius: 50%;
      border: 2px solid #d1d5db;
    }

    .habit.done .check { background: var(--done); border-color: var(--done); }
    .habit p { margin: 2px 0 0; color: var(--muted); font-size: 0.85rem; }

    .calendar-view { display: grid; grid-template-columns: 2fr 1fr; gap: 32px; }
    .grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; text-align: center; }
    .grid .dow { color: var(--muted); font-size: 0.8rem; padding: 6px 0; }
    .grid button { position: relative; color: var(--ink); padding: 10px 0; }
    .grid button.selected { background: var(--accent-soft); color: var(--accent); font-weight: 600; }
    .grid button .dot {
      position: absolute;
      bottom: 3px;
      left: 50%;
      width: 6px;
      height: 6px;
      margin-left: -3px;
      border-radius: 50%;
      background: var(--accent);
    }
    .grid button .dot.all { background: var(--done); }

    dialog { border: none; border-radius: 12px; padding: 24px; width: min(420px, 92vw); }
    dialog label { display: block; font-size: 0.85rem; margin: 12px 0 4px; }
    dialog input[type="text"], dialog input[type="date"], dialog textarea {
      width: 100%;
      padding: 8px;
      border: 1px solid #d1d5db;
      border-radius: 6px;
    }
    dialog .row { display: flex; justify-content: flex-end; gap: 8px; margin-top: 18px; }

    .status { min-height: 1.2em; color: #b91c1c; font-size: 0.9rem; }
    .hidden { display: none; }
  </style>
</head>
<body>
  <nav>
    <h1>Crier</h1>
    <div class="links">
      <button id="show-dashboard" class="active">Dashboard</button>
      <button id="show-calendar">Calendar</button>
      <button id="open-goal" class="primary">+ New Goal</button>
    </div>
  </nav>

  <main>
    <div class="status" id="status"></div>

    <section id="dashboard">
      <h2>Goals</h2>
      <div class="goals" id="goal-cards"></div>

      <div class="section-head">
        <h2>Today's Habits</h2>
        <div class="periods">
          <button data-period="30days" class="active">30 Days</button>
          <button data-period="week">Week</button>
          <button data-period="month">Month</button>
          <button class="primary open-habit">+ New Habit</button>
        </div>
      </div>
      <div id="habit-list"></div>
    </section>

    <section id="calendar" class="hidden">
      <div class="calendar-view">
        <div class="card">
          <div class="section-head">
            <h3 id="month-label"></h3>
            <div>
              <button id="prev-month">&lsaquo;</button>
              <button id="next-month">&rsaquo;</button>
            </div>
          </div>
          <div class="grid" id="month-grid"></div>
        </div>
        <div>
          <div class="section-head">
            <h3 id="selected-label"></h3>
            <button class="primary open-habit">+ New Habit</button>
          </div>
          <div id="day-habits"></div>
        </div>
      </div>
    </section>
  </main>

  <dialog id="goal-dialog">
    <form id="goal-form" method="dialog">
      <h2>New Goal</h2>
      <label for="goal-title">Title</label>
      <input type="text" id="goal-title" required />
      <label for="goal-description">Description (optional)</label>
      <textarea id="goal-description" rows="3"></textarea>
      <label for="goal-start">Start Date</label>
      <input type="date" id="goal-start" required />
      <label for="goal-end">End Date</label>
      <input type="date" id="goal-end" required />
      <div class="row">
        <button type="button" class="cancel">Cancel</button>
        <button type="submit" class="primary">Create Goal</button>
      </div>
    </form>
  </dialog>

  <dialog id="habit-dialog">
    <form id="habit-form" method="dialog">
      <h2>New Habit</h2>
      <label for="habit-title">Title</label>
      <input type="text" id="habit-title" required />
      <label for="habit-description">Description (optional)</label>
      <textarea id="habit-description" rows="3"></textarea>
      <label>Related Goals</label>
      <div id="habit-goals"></div>
      <label for="habit-date">Start Date</label>
      <input type="date" id="habit-date" required />
      <div id="repeat-row" class="hidden">
        <label><input type="checkbox" id="habit-repeat" /> Repeat daily until goal end date <span id="repeat-until"></span></label>
      </div>
      <div class="row">
        <button type="button" class="cancel">Cancel</button>
        <button type="submit" class="primary">Create Habit</button>
      </div>
    </form>
  </dialog>

  <script id="bootstrap" type="application/json">{{BOOTSTRAP}}</script>
  <script>
    const today = '{{TODAY}}';
    let state = JSON.parse(document.getElementById('bootstrap').textContent);
    let period = '30days';
    let selected = today;
    let month = { year: Number(today.slice(0, 4)), month: Number(today.slice(5, 7)) };

    const $ = (id) => document.getElementById(id);
    const setStatus = (message) => { $('status').textContent = message || ''; };
    const text = (value) => {
      const span = document.createElement('span');
      span.textContent = value == null ? '' : value;
      return span.innerHTML;
    };

    const api = async (path, options = {}) => {
      const res = await fetch(path, {
        headers: { 'content-type': 'application/json' },
        ...options,
      });
      if (!res.ok) {
        throw new Error((await res.text()) || 'Request failed');
      }
      return res.json();
    };

    const renderGoals = () => {
      $('goal-cards').innerHTML = state.goals.map((goal) => `
        <div class="card">
          <strong>${text(goal.title)}</strong>
          ${goal.description ? `<p class="meta">${text(goal.description)}</p>` : ''}
          <div class="bar"><div style="width: ${goal.progress}%"></div></div>
          <div class="meta">
            <span>${goal.progress}% Complete</span>
            <span>${goal.startDate} &rarr; ${goal.endDate}</span>
          </div>
        </div>`).join('');
    };

    const habitRows = (habits) => habits.map((habit) => `
      <div class="card habit ${habit.completed ? 'done' : ''}">
        <div style="display:flex;gap:12px;align-items:center">
          <button class="check" data-toggle="${habit.id}" aria-label="toggle"></button>
          <div>
            <strong>${text(habit.title)}</strong>
            ${habit.description ? `<p>${text(habit.description)}</p>` : ''}
          </div>
        </div>
        <span class="meta">${habit.date} &middot; ${habit.goalIds.length} goal${habit.goalIds.length !== 1 ? 's' : ''}</span>
      </div>`).join('');

    const renderHabits = async () => {
      const habits = await api(`/api/habits?period=${period}`);
      $('habit-list').innerHTML = habitRows(habits);
    };

    const renderCalendar = async () => {
      const grid = await api(`/api/calendar?year=${month.year}&month=${month.month}&selected=${selected}`);
      $('month-label').textContent = grid.label;
      const heads = ['Sun', 'Mon', 'Tue', 'Wed', 'Thu', 'Fri', 'Sat'].map((d) => `<div class="dow">${d}</div>`);
      const blanks = Array.from({ length: grid.leadingBlanks }, () => '<div></div>');
      const days = grid.days.map((day) => `
        <button class="${day.selected ? 'selected' : ''}" data-date="${day.date}">
          ${Number(day.date.slice(8, 10))}
          ${day.habitCount > 0 ? `<span class="dot ${day.allCompleted ? 'all' : ''}"></span>` : ''}
        </button>`);
      $('month-grid').innerHTML = heads.concat(blanks, days).join('');
      $('prev-month').onclick = () => { month = grid.previous; renderCalendar().catch((e) => setStatus(e.message)); };
      $('next-month').onclick = () => { month = grid.next; renderCalendar().catch((e) => setStatus(e.message)); };
      $('selected-label').textContent = selected;
      $('day-habits').innerHTML = habitRows(await api(`/api/habits?date=${selected}`));
    };

    const refresh = async () => {
      renderGoals();
      await Promise.all([renderHabits(), renderCalendar()]);
    };

    const reload = async () => {
      const [goals, habits] = await Promise.all([api('/api/goals'), api('/api/habits')]);
      state = { goals, habits };
      await refresh();
    };

    document.addEventListener('click', (event) => {
      const toggle = event.target.closest('[data-toggle]');
      if (toggle) {
        api(`/api/habits/${toggle.dataset.toggle}/toggle`, { method: 'POST' })
          .then(reload)
          .catch((err) => setStatus(err.message));
        return;
      }
      const dayButton = event.target.closest('[data-date]');
      if (dayButton) {
        selected = dayButton.dataset.date;
        renderCalendar().catch((err) => setStatus(err.message));
      }
    });

    document.querySelectorAll('[data-period]').forEach((button) => {
      button.addEventListener('click', () => {
        period = button.dataset.period;
        document.querySelectorAll('[data-period]').forEach((b) => b.classList.toggle('active', b === button));
        renderHabits().catch((err) => setStatus(err.message));
      });
    });

    const showView = (view) => {
      $('dashboard').classList.toggle('hidden', view !== 'dashboard');
      $('calendar').classList.toggle('hidden', view !== 'calendar');
      $('show-dashboard').classList.toggle('active', view === 'dashboard');
      $('show-calendar').classList.toggle('active', view === 'calendar');
    };
    $('show-dashboard').onclick = () => showView('dashboard');
    $('show-calendar').onclick = () => showView('calendar');

    document.querySelectorAll('dialog .cancel').forEach((button) => {
      button.addEventListener('click', () => button.closest('dialog').close());
    });

    $('open-goal').onclick = () => {
      $('goal-start').value = today;
      $('goal-end').value = today;
      $('goal-dialog').showModal();
    };

    $('goal-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/goals', {
        method: 'POST',
        body: JSON.stringify({
          title: $('goal-title').value,
          description: $('goal-description').value,
          startDate: $('goal-start').value,
          endDate: $('goal-end').value,
        }),
      })
        .then(() => { $('goal-form').reset(); $('goal-dialog').close(); return reload(); })
        .catch((err) => setStatus(err.message));
    });

    const selectedGoalIds = () =>
      Array.from(document.querySelectorAll('#habit-goals input:checked')).map((input) => input.value);

    const updateSpan = async () => {
      const ids = selectedGoalIds();
      $('repeat-row').classList.toggle('hidden', ids.length === 0);
      if (ids.length === 0) {
        $('habit-date').removeAttribute('min');
        $('habit-date').removeAttribute('max');
        $('habit-repeat').checked = false;
        return;
      }
      const span = await api(`/api/goals/span?goalIds=${encodeURIComponent(ids.join(','))}`);
      $('habit-date').min = span.start;
      $('habit-date').max = span.end;
      $('repeat-until').textContent = `(until ${span.end})`;
    };

    document.querySelectorAll('.open-habit').forEach((button) => {
      button.addEventListener('click', () => {
        $('habit-goals').innerHTML = state.goals.map((goal) => `
          <label><input type="checkbox" value="${goal.id}" /> ${text(goal.title)}</label>`).join('');
        $('habit-goals').querySelectorAll('input').forEach((input) => {
          input.addEventListener('change', () => updateSpan().catch((err) => setStatus(err.message)));
        });
        $('habit-date').value = selected;
        updateSpan().catch((err) => setStatus(err.message));
        $('habit-dialog').showModal();
      });
    });

    $('habit-form').addEventListener('submit', (event) => {
      event.preventDefault();
      api('/api/habits', {
        method: 'POST',
        body: JSON.stringify({
          title: $('habit-title').value,
          description: $('habit-description').value,
          date: $('habit-date').value,
          goalIds: selectedGoalIds(),
          repeat: $('habit-repeat').checked,
        }),
      })
        .then(() => { $('habit-form').reset(); $('habit-dialog').close(); return reload(); })
        .catch((err) => setStatus(err.message));
    });

    refresh().catch((err) => setStatus(err.message));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracker::Tracker;

    #[test]
    fn embeds_snapshot_and_today() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let tracker = Tracker::with_sample_data(today);
        let page = render_index(today, &tracker.snapshot()).unwrap();
        assert!(page.contains("const today = '2024-03-01';"));
        assert!(page.contains("Learn French A2"));
        assert!(page.contains("\"goalIds\""));
        assert!(!page.contains("{{BOOTSTRAP}}"));
    }

    #[test]
    fn script_close_tags_are_escaped() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut tracker = Tracker::new();
        tracker.add_goal(crate::models::NewGoal {
            title: "</script><b>".to_string(),
            description: None,
            start_date: today,
            end_date: today,
        });
        let page = render_index(today, &tracker.snapshot()).unwrap();
        assert!(!page.contains("</script><b>"));
        assert!(page.contains("<\\/script><b>"));
    }
}
